//! Error types for metadata scrubbing operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScrubError`.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Represents a specific extraction limit that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Entry count limit exceeded.
    FileCount {
        /// Current entry count.
        current: usize,
        /// Maximum allowed entry count.
        max: usize,
    },
    /// Total uncompressed size limit exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single entry size limit exceeded.
    FileSize {
        /// Entry size in bytes.
        size: u64,
        /// Maximum allowed entry size in bytes.
        max: u64,
    },
    /// Integer overflow detected in size accounting.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "limit exceeded: entry count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "limit exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "limit exceeded: single entry size ({size} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "limit exceeded: integer overflow in size accounting")
            }
        }
    }
}

/// Errors that can occur while inspecting or cleaning metadata.
///
/// Variants fall in two groups. Per-entry errors ([`UnsafeEntry`],
/// [`EngineInvocation`]) are downgraded to a per-file result and the job
/// continues. Everything else aborts the job after its workspace has been
/// released.
///
/// [`UnsafeEntry`]: ScrubError::UnsafeEntry
/// [`EngineInvocation`]: ScrubError::EngineInvocation
#[derive(Error, Debug)]
pub enum ScrubError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Temporary workspace could not be created or fully removed.
    #[error("workspace error at {path}: {reason}")]
    Workspace {
        /// Workspace directory (or its intended parent).
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Source archive is corrupted or not a ZIP archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Archive entry would escape the workspace root.
    #[error("unsafe archive entry {name}: {reason}")]
    UnsafeEntry {
        /// Entry name as stored in the archive.
        name: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The metadata engine executable could not be located.
    #[error("metadata engine not found: {0}")]
    EngineNotFound(String),

    /// The metadata engine failed for one file.
    #[error("metadata engine failed for {path}: {detail}")]
    EngineInvocation {
        /// File the engine was invoked on.
        path: PathBuf,
        /// Captured stderr or a description of the malformed output.
        detail: String,
    },

    /// Destination archive could not be written.
    #[error("cannot write archive {path}: {reason}")]
    Repack {
        /// Destination path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Output path exists and overwrite was not confirmed.
    #[error("destination already exists: {path}")]
    DestinationExists {
        /// The existing path.
        path: PathBuf,
    },

    /// Destination resolves to the source archive.
    #[error("destination is the source archive: {path}")]
    DestinationIsSource {
        /// The shared path.
        path: PathBuf,
    },

    /// Extraction limit exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// Potential zip bomb detected.
    #[error(
        "potential zip bomb: compressed={compressed} bytes, uncompressed={uncompressed} bytes (ratio: {ratio:.2})"
    )]
    ZipBomb {
        /// Compressed size in bytes.
        compressed: u64,
        /// Uncompressed size in bytes.
        uncompressed: u64,
        /// Compression ratio.
        ratio: f64,
    },

    /// Tag name rejected before reaching the engine.
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// GPS coordinates outside the valid range.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Job was cancelled at an entry boundary.
    #[error("operation cancelled")]
    Cancelled,
}

impl ScrubError {
    /// Returns `true` if this error only affects a single archive entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use metascrub_core::ScrubError;
    ///
    /// let err = ScrubError::UnsafeEntry {
    ///     name: "../etc/passwd".into(),
    ///     reason: "parent directory component".into(),
    /// };
    /// assert!(err.is_per_entry());
    ///
    /// let err = ScrubError::InvalidArchive("bad header".into());
    /// assert!(!err.is_per_entry());
    /// ```
    #[must_use]
    pub const fn is_per_entry(&self) -> bool {
        matches!(
            self,
            Self::UnsafeEntry { .. } | Self::EngineInvocation { .. }
        )
    }

    /// Returns `true` if this error aborts the whole job.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_per_entry()
    }

    /// Returns `true` if this error represents a malicious-looking archive.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsafeEntry { .. } | Self::ZipBomb { .. } | Self::QuotaExceeded { .. }
        )
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }

    pub(crate) fn workspace(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
