//! Validated metadata tag names.

use std::fmt;

use crate::Result;
use crate::ScrubError;

/// A tag name that is safe to splice into an engine argument such as
/// `-Artist=`.
///
/// Accepts an optional `Group:` prefix (`XMP:Description`, `IPTC:Keywords`)
/// followed by a name made of ASCII letters, digits, `_` and `-`. Anything
/// else is rejected before the engine is invoked, so a tag can never turn into
/// an extra engine option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(pub(crate) String);

impl TagName {
    /// Validates and constructs a tag name.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::InvalidTagName` for empty names, names starting
    /// with `-`, or names containing characters outside the allowed set.
    ///
    /// # Examples
    ///
    /// ```
    /// use metascrub_core::types::TagName;
    ///
    /// assert!(TagName::new("XMP:Description").is_ok());
    /// assert!(TagName::new("all= -o /tmp/x").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        let valid = !trimmed.is_empty()
            && !trimmed.starts_with('-')
            && trimmed.split(':').count() <= 2
            && trimmed.split(':').all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            });

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ScrubError::InvalidTagName(name))
        }
    }

    /// Returns the tag name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tag together with the value to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAssignment {
    /// Tag to write.
    pub tag: TagName,
    /// New value. May be empty, which deletes the tag.
    pub value: String,
}

impl TagAssignment {
    /// Creates an assignment.
    pub fn new(tag: TagName, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Parses `TAG=VALUE`.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::InvalidTagName` when the `=` is missing or the tag
    /// is invalid.
    pub fn parse(s: &str) -> Result<Self> {
        let (tag, value) = s
            .split_once('=')
            .ok_or_else(|| ScrubError::InvalidTagName(s.to_string()))?;
        Ok(Self::new(TagName::new(tag)?, value))
    }

    /// Renders the engine argument `-TAG=VALUE`.
    #[must_use]
    pub fn to_arg(&self) -> String {
        format!("-{}={}", self.tag, self.value)
    }
}
