//! GPS coordinates in decimal degrees.

use crate::Result;
use crate::ScrubError;

use super::TagAssignment;
use super::TagName;

/// Validated decimal-degree coordinates.
///
/// Positive latitude is north, positive longitude is east. Altitude is in
/// metres; negative values are below sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinates {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
}

impl GpsCoordinates {
    /// Validates and constructs coordinates.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::InvalidCoordinates` when latitude is outside
    /// -90..=90, longitude outside -180..=180, or any value is not finite.
    pub fn new(latitude: f64, longitude: f64, altitude: Option<f64>) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ScrubError::InvalidCoordinates(format!(
                "latitude {latitude} outside -90..90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ScrubError::InvalidCoordinates(format!(
                "longitude {longitude} outside -180..180"
            )));
        }
        if altitude.is_some_and(|alt| !alt.is_finite()) {
            return Err(ScrubError::InvalidCoordinates(
                "altitude is not a number".to_string(),
            ));
        }

        Ok(Self {
            latitude,
            longitude,
            altitude,
        })
    }

    /// Latitude in signed decimal degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in signed decimal degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in metres, if set.
    #[must_use]
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Converts the coordinates into the tag writes the engine expects:
    /// unsigned magnitudes plus `N`/`S`, `E`/`W` and altitude reference
    /// `0` (above) or `1` (below sea level).
    #[must_use]
    pub fn to_assignments(&self) -> Vec<TagAssignment> {
        let mut tags = vec![
            assignment("GPSLatitude", self.latitude.abs().to_string()),
            assignment(
                "GPSLatitudeRef",
                if self.latitude >= 0.0 { "N" } else { "S" }.to_string(),
            ),
            assignment("GPSLongitude", self.longitude.abs().to_string()),
            assignment(
                "GPSLongitudeRef",
                if self.longitude >= 0.0 { "E" } else { "W" }.to_string(),
            ),
        ];

        if let Some(alt) = self.altitude {
            tags.push(assignment("GPSAltitude", alt.abs().to_string()));
            tags.push(assignment(
                "GPSAltitudeRef",
                if alt >= 0.0 { "0" } else { "1" }.to_string(),
            ));
        }

        tags
    }
}

/// Parses a coordinate as printed by the engine into signed decimal degrees.
///
/// Accepts plain decimals (`"40.7128"`) and degree/minute/second text
/// (`40 deg 42' 46.08" N`). A trailing `S` or `W`, or a `reference` such as
/// `South` or `W`, makes the result negative.
///
/// # Examples
///
/// ```
/// use metascrub_core::types::gps::parse_coordinate;
///
/// let lat = parse_coordinate("40 deg 42' 46.08\" N", None).unwrap();
/// assert!((lat - 40.7128).abs() < 1e-4);
/// assert_eq!(parse_coordinate("12.5", Some("W")), Some(-12.5));
/// ```
#[must_use]
pub fn parse_coordinate(text: &str, reference: Option<&str>) -> Option<f64> {
    let mut negative = reference
        .map(str::trim)
        .is_some_and(|r| r.starts_with(['S', 'W']));
    let mut parts = Vec::with_capacity(3);

    for token in text.split_whitespace() {
        match token {
            "deg" | "N" | "E" => {}
            "S" | "W" => negative = true,
            _ => {
                let number = token.trim_end_matches(['\'', '"']);
                parts.push(number.parse::<f64>().ok()?);
            }
        }
    }

    let magnitude = match parts.as_slice() {
        [deg] => *deg,
        [deg, min] => deg + min / 60.0,
        [deg, min, sec] => deg + min / 60.0 + sec / 3600.0,
        _ => return None,
    };

    Some(if negative { -magnitude.abs() } else { magnitude })
}

fn assignment(tag: &'static str, value: String) -> TagAssignment {
    // Constant names always pass validation.
    TagAssignment {
        tag: TagName(tag.to_string()),
        value,
    }
}
