//! External metadata engine collaborator.
//!
//! Every metadata read and write is delegated to an external process. The
//! [`MetadataEngine`] trait is the seam: the pipeline only ever talks to the
//! trait, [`ExifTool`] drives the real binary, and tests substitute a fake.

pub mod exiftool;
pub mod summary;

use std::fmt;
use std::path::Path;

use serde_json::Map;
use serde_json::Value;

use crate::Result;
use crate::types::TagAssignment;
use crate::types::TagName;

pub use exiftool::ExifTool;
pub use summary::EngineSummary;

/// Metadata of one file as returned by the engine: either grouped
/// (`{"EXIF": {"Make": ..}, ..}`) or flat (`{"Make": .., ..}`).
pub type TagMap = Map<String, Value>;

/// Groups that describe the file or the tool rather than embedded metadata.
pub const NON_METADATA_GROUPS: [&str; 3] = ["ExifTool", "File", "Composite"];

/// Which metadata fields a strip operation removes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldScope {
    /// Every writable field.
    All,
    /// Only fields of the GPS group.
    Gps,
    /// One named field.
    Tag(TagName),
}

impl FieldScope {
    /// Renders the engine deletion argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use metascrub_core::engine::FieldScope;
    /// use metascrub_core::types::TagName;
    ///
    /// assert_eq!(FieldScope::All.to_arg(), "-all=");
    /// assert_eq!(FieldScope::Gps.to_arg(), "-gps:all=");
    /// let tag = TagName::new("Artist")?;
    /// assert_eq!(FieldScope::Tag(tag).to_arg(), "-Artist=");
    /// # Ok::<(), metascrub_core::ScrubError>(())
    /// ```
    #[must_use]
    pub fn to_arg(&self) -> String {
        match self {
            Self::All => "-all=".to_string(),
            Self::Gps => "-gps:all=".to_string(),
            Self::Tag(tag) => format!("-{tag}="),
        }
    }
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all metadata"),
            Self::Gps => f.write_str("GPS data"),
            Self::Tag(tag) => write!(f, "tag {tag}"),
        }
    }
}

/// Typed interface to the external metadata engine.
///
/// Implementations must be `Send + Sync`; the batch stripper may call them
/// from several worker threads at once, each time on a distinct file.
///
/// `backup = true` asks the engine to keep a copy of the original next to the
/// modified file (`<name>_original` for ExifTool); `false` overwrites.
pub trait MetadataEngine: Send + Sync {
    /// Returns the engine's version string.
    fn version(&self) -> Result<String>;

    /// Removes the fields selected by `scope` from `path` in place.
    fn strip(&self, path: &Path, scope: &FieldScope, backup: bool) -> Result<EngineSummary>;

    /// Reads all metadata of `path`, grouped by family-0 group.
    fn read_grouped(&self, path: &Path) -> Result<TagMap>;

    /// Reads the named tags of `path` as a flat map.
    fn read_tags(&self, path: &Path, tags: &[TagName]) -> Result<TagMap>;

    /// Writes tags to `path` in place.
    fn write_tags(
        &self,
        path: &Path,
        tags: &[TagAssignment],
        backup: bool,
    ) -> Result<EngineSummary>;

    /// Copies all writable metadata from `source` onto `target`.
    fn copy_tags(&self, source: &Path, target: &Path, backup: bool) -> Result<EngineSummary>;

    /// Strips every file below `dir` in a single recursive invocation,
    /// optionally restricted to the given extensions.
    fn strip_tree(
        &self,
        dir: &Path,
        scope: &FieldScope,
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary>;

    /// Writes the same tags to every file below `dir`.
    fn write_tree(
        &self,
        dir: &Path,
        tags: &[TagAssignment],
        extensions: &[String],
        backup: bool,
    ) -> Result<EngineSummary>;

    /// Counts the embedded metadata fields of `path` without modifying it.
    fn field_count(&self, path: &Path) -> Result<usize> {
        Ok(count_fields(&self.read_grouped(path)?))
    }
}

/// Counts metadata fields in engine output, ignoring `SourceFile` and the
/// [`NON_METADATA_GROUPS`].
///
/// Nested group objects contribute one per member; top-level scalars (flat
/// output) contribute one each.
#[must_use]
pub fn count_fields(tags: &TagMap) -> usize {
    tags.iter()
        .filter(|(key, _)| key.as_str() != "SourceFile")
        .filter(|(key, _)| !NON_METADATA_GROUPS.contains(&key.as_str()))
        .map(|(_, value)| match value {
            Value::Object(group) => group.len(),
            _ => 1,
        })
        .sum()
}
