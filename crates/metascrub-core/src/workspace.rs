//! Scoped temporary workspace for one job.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use tempfile::TempDir;

use crate::JobConfig;
use crate::Result;
use crate::ScrubError;

/// Name prefix of every workspace directory.
pub const WORKSPACE_PREFIX: &str = "metascrub-";

/// Age after which a leftover workspace is considered abandoned.
pub const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// A uniquely named directory that exists for exactly one job.
///
/// The directory is created with owner-only permissions by `tempfile`.
/// [`release`](Self::release) removes it and reports failures; dropping the
/// workspace without releasing it still removes it on a best-effort basis, so
/// a panic or early return never leaks the extracted files.
#[derive(Debug)]
pub struct TempWorkspace {
    dir: TempDir,
    root: PathBuf,
}

impl TempWorkspace {
    /// Creates a fresh workspace under [`JobConfig::workspace_parent`].
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::Workspace` if the directory cannot be created.
    pub fn acquire(config: &JobConfig) -> Result<Self> {
        let parent = config.workspace_parent();
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| ScrubError::workspace(&parent, &e))?;

        // Entry validation compares against a canonical root.
        let root = dir
            .path()
            .canonicalize()
            .map_err(|e| ScrubError::workspace(dir.path(), &e))?;

        tracing::debug!(workspace = %root.display(), "acquired workspace");
        Ok(Self { dir, root })
    }

    /// Canonical path of the workspace directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deletes the workspace and everything in it.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::Workspace` if the directory could not be fully
    /// removed.
    pub fn release(self) -> Result<()> {
        let root = self.root;
        self.dir
            .close()
            .map_err(|e| ScrubError::workspace(&root, &e))?;
        tracing::debug!(workspace = %root.display(), "released workspace");
        Ok(())
    }
}

/// Result of a stale-workspace sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Workspaces that were removed.
    pub removed: Vec<PathBuf>,
    /// Workspaces that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Removes workspace directories under `parent` whose last modification is
/// at least `older_than` ago.
///
/// Only directories named with [`WORKSPACE_PREFIX`] are considered; symlinks
/// are never followed.
///
/// # Errors
///
/// Returns `ScrubError::Workspace` if `parent` cannot be listed. Failures on
/// individual directories are collected in the report instead.
pub fn sweep_stale(parent: &Path, older_than: Duration) -> Result<SweepReport> {
    let mut report = SweepReport::default();
    let now = SystemTime::now();

    let entries = fs::read_dir(parent).map_err(|e| ScrubError::workspace(parent, &e))?;
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(WORKSPACE_PREFIX) {
            continue;
        }

        let path = entry.path();
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or(Duration::ZERO);
        if age < older_than {
            continue;
        }

        match fs::remove_dir_all(&path) {
            Ok(()) => {
                tracing::info!(workspace = %path.display(), "removed stale workspace");
                report.removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(workspace = %path.display(), error = %e, "cannot remove stale workspace");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir as TestDir;

    #[test]
    fn test_acquire_and_release() {
        let parent = TestDir::new().unwrap();
        let config = JobConfig::default().with_workspace_root(parent.path());

        let workspace = TempWorkspace::acquire(&config).unwrap();
        let root = workspace.root().to_path_buf();
        assert!(root.is_dir());
        assert!(
            root.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(WORKSPACE_PREFIX)
        );

        fs::write(root.join("a.jpg"), b"data").unwrap();
        workspace.release().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_drop_removes_workspace() {
        let parent = TestDir::new().unwrap();
        let config = JobConfig::default().with_workspace_root(parent.path());

        let root = {
            let workspace = TempWorkspace::acquire(&config).unwrap();
            workspace.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_distinct_workspaces() {
        let parent = TestDir::new().unwrap();
        let config = JobConfig::default().with_workspace_root(parent.path());

        let a = TempWorkspace::acquire(&config).unwrap();
        let b = TempWorkspace::acquire(&config).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_acquire_missing_parent() {
        let parent = TestDir::new().unwrap();
        let config = JobConfig::default().with_workspace_root(parent.path().join("missing"));
        let err = TempWorkspace::acquire(&config).unwrap_err();
        assert!(matches!(err, ScrubError::Workspace { .. }));
    }

    #[test]
    fn test_sweep_only_touches_prefixed_dirs() {
        let parent = TestDir::new().unwrap();
        let stale = parent.path().join("metascrub-old");
        let other = parent.path().join("unrelated");
        fs::create_dir(&stale).unwrap();
        fs::write(stale.join("x.jpg"), b"x").unwrap();
        fs::create_dir(&other).unwrap();
        fs::write(parent.path().join("metascrub-file"), b"not a dir").unwrap();

        let report = sweep_stale(parent.path(), Duration::ZERO).unwrap();
        assert_eq!(report.removed, vec![stale.clone()]);
        assert!(report.failed.is_empty());
        assert!(!stale.exists());
        assert!(other.exists());
        assert!(parent.path().join("metascrub-file").exists());
    }

    #[test]
    fn test_sweep_keeps_recent_dirs() {
        let parent = TestDir::new().unwrap();
        let recent = parent.path().join("metascrub-recent");
        fs::create_dir(&recent).unwrap();

        let report = sweep_stale(parent.path(), STALE_AFTER).unwrap();
        assert!(report.removed.is_empty());
        assert!(recent.exists());
    }
}
