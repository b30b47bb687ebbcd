//! Single-file and folder operations.
//!
//! Thin wrappers over a [`MetadataEngine`] that validate their inputs before
//! the engine is invoked. Archive jobs live in [`crate::job`].

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::Result;
use crate::ScrubError;
use crate::engine::EngineSummary;
use crate::engine::FieldScope;
use crate::engine::MetadataEngine;
use crate::engine::TagMap;
use crate::job::check_source;
use crate::job::same_file;
use crate::report::StripStatus;
use crate::types::GpsCoordinates;
use crate::types::TagAssignment;
use crate::types::TagName;
use crate::types::gps::parse_coordinate;

/// Tags read by [`read_gps`].
pub const GPS_TAGS: [&str; 9] = [
    "GPSLatitude",
    "GPSLongitude",
    "GPSAltitude",
    "GPSLatitudeRef",
    "GPSLongitudeRef",
    "GPSAltitudeRef",
    "GPSSpeed",
    "GPSDateStamp",
    "GPSTimeStamp",
];

/// Options for [`strip_file`].
#[derive(Debug, Clone, Default)]
pub struct StripOptions {
    /// Strip a copy written here instead of the file itself.
    pub output: Option<PathBuf>,
    /// Keep the engine's `_original` backup when stripping in place.
    pub backup: bool,
    /// Replace an existing `output`.
    pub overwrite: bool,
}

/// Reads all metadata of a file, grouped by family-0 group.
///
/// # Errors
///
/// `ScrubError::Io` if `path` is not a readable file, or any engine error.
pub fn read_metadata(engine: &dyn MetadataEngine, path: &Path) -> Result<TagMap> {
    check_source(path)?;
    engine.read_grouped(path)
}

/// Removes metadata from one file, in place or into a copy.
///
/// With [`StripOptions::output`] the source is copied first and only the
/// copy is stripped; the copy is deleted again if the engine fails.
///
/// # Errors
///
/// - `ScrubError::DestinationIsSource` if the output names the source
/// - `ScrubError::DestinationExists` if the output exists without overwrite
/// - `ScrubError::EngineInvocation` if the engine fails or reports errors
///
/// # Examples
///
/// ```no_run
/// use metascrub_core::api::StripOptions;
/// use metascrub_core::api::strip_file;
/// use metascrub_core::engine::ExifTool;
/// use metascrub_core::engine::FieldScope;
/// use std::path::Path;
///
/// # fn main() -> Result<(), metascrub_core::ScrubError> {
/// let engine = ExifTool::locate()?;
/// let options = StripOptions {
///     output: Some("photo_clean.jpg".into()),
///     ..StripOptions::default()
/// };
/// let status = strip_file(&engine, Path::new("photo.jpg"), &FieldScope::Gps, &options)?;
/// println!("{status}");
/// # Ok(())
/// # }
/// ```
pub fn strip_file(
    engine: &dyn MetadataEngine,
    path: &Path,
    scope: &FieldScope,
    options: &StripOptions,
) -> Result<StripStatus> {
    check_source(path)?;

    let Some(output) = options.output.as_deref() else {
        let summary = engine.strip(path, scope, options.backup)?;
        return status_of(path, &summary);
    };

    if same_file(path, output) {
        return Err(ScrubError::DestinationIsSource {
            path: output.to_path_buf(),
        });
    }
    if output.exists() && !options.overwrite {
        return Err(ScrubError::DestinationExists {
            path: output.to_path_buf(),
        });
    }

    fs::copy(path, output)?;
    let outcome = engine
        .strip(output, scope, false)
        .and_then(|summary| status_of(output, &summary));

    if outcome.is_err()
        && let Err(e) = fs::remove_file(output)
        && e.kind() != io::ErrorKind::NotFound
    {
        tracing::warn!(path = %output.display(), error = %e, "cannot remove failed copy");
    }
    outcome
}

fn status_of(path: &Path, summary: &EngineSummary) -> Result<StripStatus> {
    if summary.errors > 0 {
        return Err(ScrubError::EngineInvocation {
            path: path.to_path_buf(),
            detail: summary.raw.clone(),
        });
    }
    Ok(if summary.updated > 0 {
        StripStatus::Cleaned
    } else {
        StripStatus::Unchanged
    })
}

/// GPS tags read from a file.
#[derive(Debug, Clone, Default)]
pub struct GpsReading {
    /// Raw engine values keyed by tag name.
    pub tags: TagMap,
}

impl GpsReading {
    /// Returns a tag value as display text.
    #[must_use]
    pub fn text(&self, tag: &str) -> Option<String> {
        match self.tags.get(tag)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Returns `true` if neither latitude nor longitude is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text("GPSLatitude").is_none() && self.text("GPSLongitude").is_none()
    }

    /// Signed decimal latitude.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        let reference = self.text("GPSLatitudeRef");
        parse_coordinate(&self.text("GPSLatitude")?, reference.as_deref())
    }

    /// Signed decimal longitude.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        let reference = self.text("GPSLongitudeRef");
        parse_coordinate(&self.text("GPSLongitude")?, reference.as_deref())
    }

    /// Map link for the position, if both coordinates parse.
    #[must_use]
    pub fn map_link(&self) -> Option<String> {
        Some(format!(
            "https://maps.google.com/?q={},{}",
            self.latitude()?,
            self.longitude()?
        ))
    }
}

/// Reads the [`GPS_TAGS`] of a file.
///
/// # Errors
///
/// `ScrubError::Io` if `path` is not a readable file, or any engine error.
pub fn read_gps(engine: &dyn MetadataEngine, path: &Path) -> Result<GpsReading> {
    check_source(path)?;
    let tags: Vec<TagName> = GPS_TAGS
        .iter()
        .map(|tag| TagName::new(*tag))
        .collect::<Result<_>>()?;
    let mut values = engine.read_tags(path, &tags)?;
    values.remove("SourceFile");
    Ok(GpsReading { tags: values })
}

/// Writes GPS coordinates to a file.
///
/// # Errors
///
/// `ScrubError::Io` if `path` is not a readable file, or any engine error.
pub fn write_gps(
    engine: &dyn MetadataEngine,
    path: &Path,
    coordinates: &GpsCoordinates,
    backup: bool,
) -> Result<EngineSummary> {
    write_tags(engine, path, &coordinates.to_assignments(), backup)
}

/// Writes one or more tags to a file.
///
/// # Errors
///
/// - `ScrubError::InvalidTagName` if `tags` is empty
/// - `ScrubError::EngineInvocation` if the engine fails or reports errors
pub fn write_tags(
    engine: &dyn MetadataEngine,
    path: &Path,
    tags: &[TagAssignment],
    backup: bool,
) -> Result<EngineSummary> {
    check_source(path)?;
    if tags.is_empty() {
        return Err(ScrubError::InvalidTagName(String::new()));
    }
    let summary = engine.write_tags(path, tags, backup)?;
    status_of(path, &summary)?;
    Ok(summary)
}

/// Copies all writable metadata from `source` onto `target`.
///
/// # Errors
///
/// - `ScrubError::DestinationIsSource` if both paths name the same file
/// - `ScrubError::EngineInvocation` if the engine fails or reports errors
pub fn copy_tags(
    engine: &dyn MetadataEngine,
    source: &Path,
    target: &Path,
    backup: bool,
) -> Result<EngineSummary> {
    check_source(source)?;
    check_source(target)?;
    if same_file(source, target) {
        return Err(ScrubError::DestinationIsSource {
            path: target.to_path_buf(),
        });
    }
    let summary = engine.copy_tags(source, target, backup)?;
    status_of(target, &summary)?;
    Ok(summary)
}

/// What to do with every file of a folder.
#[derive(Debug, Clone)]
pub enum FolderAction {
    /// Remove the selected fields.
    Strip(FieldScope),
    /// Write the same tags everywhere.
    Write(Vec<TagAssignment>),
}

/// Applies `action` to every file below `dir` in one recursive engine call.
///
/// `extensions` restricts the files touched (`["jpg", "png"]`); empty means
/// every file the engine supports. The returned summary may count failures;
/// they do not make this function fail.
///
/// # Errors
///
/// `ScrubError::Io` if `dir` is not a directory, or any engine error.
pub fn process_folder(
    engine: &dyn MetadataEngine,
    dir: &Path,
    action: &FolderAction,
    extensions: &[String],
    backup: bool,
) -> Result<EngineSummary> {
    if !fs::metadata(dir)?.is_dir() {
        return Err(ScrubError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let summary = match action {
        FolderAction::Strip(scope) => engine.strip_tree(dir, scope, extensions, backup)?,
        FolderAction::Write(tags) => {
            if tags.is_empty() {
                return Err(ScrubError::InvalidTagName(String::new()));
            }
            engine.write_tree(dir, tags, extensions, backup)?
        }
    };

    tracing::info!(dir = %dir.display(), summary = %summary.describe(), "folder processed");
    Ok(summary)
}
