//! Job configuration.

use std::path::Path;
use std::path::PathBuf;

/// Limits enforced while unpacking an archive into the workspace.
///
/// The defaults are deliberately conservative; a caller handling large
/// photo libraries is expected to raise them explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionLimits {
    /// Maximum number of entries in the source archive.
    pub max_file_count: usize,

    /// Maximum uncompressed size of a single entry in bytes.
    pub max_file_size: u64,

    /// Maximum total uncompressed size in bytes.
    pub max_total_size: u64,

    /// Maximum compression ratio allowed (uncompressed / compressed).
    pub max_compression_ratio: f64,
}

impl Default for ExtractionLimits {
    /// Default values:
    /// - `max_file_count`: 10,000
    /// - `max_file_size`: 1 GB
    /// - `max_total_size`: 4 GB
    /// - `max_compression_ratio`: 100.0
    fn default() -> Self {
        Self {
            max_file_count: 10_000,
            max_file_size: 1024 * 1024 * 1024,
            max_total_size: 4 * 1024 * 1024 * 1024,
            max_compression_ratio: 100.0,
        }
    }
}

/// Configuration for one archive job.
///
/// # Examples
///
/// ```
/// use metascrub_core::JobConfig;
///
/// let config = JobConfig::default()
///     .with_overwrite(true)
///     .with_workers(4);
/// assert!(config.overwrite);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    /// Extraction limits (zip-bomb and quota guards).
    pub limits: ExtractionLimits,

    /// Parent directory for temporary workspaces. `None` means the system
    /// temporary directory.
    pub workspace_root: Option<PathBuf>,

    /// Overwrite an existing destination archive.
    pub overwrite: bool,

    /// Reapply the recorded permission bits when repacking.
    pub preserve_permissions: bool,

    /// Number of concurrent engine invocations. Clamped to `1..=cpu count`.
    pub workers: usize,

    /// Deflate level for repacked entries that were originally compressed.
    /// `None` uses the zip crate's default.
    pub compression_level: Option<u8>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            limits: ExtractionLimits::default(),
            workspace_root: None,
            overwrite: false,
            preserve_permissions: true,
            workers: 1,
            compression_level: None,
        }
    }
}

impl JobConfig {
    /// Sets the extraction limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ExtractionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the parent directory for temporary workspaces.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Allows or forbids overwriting the destination.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether permission bits are reapplied on repack.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the number of concurrent engine invocations.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the deflate level used when repacking.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Returns the directory workspaces are created in.
    #[must_use]
    pub fn workspace_parent(&self) -> PathBuf {
        self.workspace_root
            .as_deref()
            .map_or_else(std::env::temp_dir, Path::to_path_buf)
    }

    /// Returns the effective worker count, between 1 and the CPU count.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        self.workers.clamp(1, cpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JobConfig::default();
        assert!(!config.overwrite);
        assert!(config.preserve_permissions);
        assert_eq!(config.workers, 1);
        assert_eq!(config.limits.max_file_count, 10_000);
    }

    #[test]
    fn test_workspace_parent_defaults_to_temp_dir() {
        let config = JobConfig::default();
        assert_eq!(config.workspace_parent(), std::env::temp_dir());

        let config = config.with_workspace_root("/var/tmp/scrub");
        assert_eq!(config.workspace_parent(), PathBuf::from("/var/tmp/scrub"));
    }

    #[test]
    fn test_effective_workers_is_clamped() {
        let config = JobConfig::default().with_workers(0);
        assert_eq!(config.effective_workers(), 1);

        let config = JobConfig::default().with_workers(usize::MAX);
        let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        assert_eq!(config.effective_workers(), cpus);
    }
}
