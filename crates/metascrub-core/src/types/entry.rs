//! Archive entry manifest types.

use std::path::Path;

use super::SafePath;

/// Kind of an extracted archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file; stripped or inspected by the engine.
    File,
    /// Directory; recreated on repack so empty directories survive.
    Directory,
}

/// Compression method recorded for an entry, reused when repacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionHint {
    /// Entry was stored without compression.
    Stored,
    /// Entry was deflated (or used a method this tool re-encodes as deflate).
    Deflated,
}

impl CompressionHint {
    /// Maps a zip crate compression method onto a hint.
    ///
    /// Anything other than `Stored` is rewritten as deflate, the one method
    /// every ZIP reader supports.
    #[must_use]
    pub fn from_method(method: zip::CompressionMethod) -> Self {
        if method == zip::CompressionMethod::Stored {
            Self::Stored
        } else {
            Self::Deflated
        }
    }
}

/// One entry of the source archive as recorded during extraction.
///
/// Read-only after extraction; the repacker uses it to rebuild the output
/// archive in the original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Validated path relative to the workspace root.
    pub relative_path: SafePath,
    /// File or directory.
    pub kind: EntryKind,
    /// Unix permission bits stored in the archive, if any.
    pub original_permissions: Option<u32>,
    /// Compression method to reuse on repack.
    pub compression_hint: CompressionHint,
}

impl ArchiveEntry {
    /// Returns the entry path relative to the workspace root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.relative_path.as_path()
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
