//! Validated entry path type for workspace extraction.

use crate::Result;
use crate::ScrubError;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Maximum number of components an entry path may have.
pub const MAX_PATH_DEPTH: usize = 64;

/// A relative archive entry path that has been validated to stay inside the
/// workspace root.
///
/// `SafePath` represents a path that has been validated to not contain:
/// - Parent directory traversal (`..`)
/// - Null bytes
/// - Absolute paths, drive prefixes or UNC roots
/// - Excessive path depth
///
/// Backslashes are treated as separators, so `a\b.jpg` and `a/b.jpg` name the
/// same entry on every platform.
///
/// # Security Properties
///
/// - Can ONLY be constructed through validation
/// - NO `From<PathBuf>` implementation
/// - Always resolves within the workspace root
///
/// # Examples
///
/// ```no_run
/// use metascrub_core::types::SafePath;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = Path::new("/tmp/metascrub-abc123");
///
/// let safe = SafePath::validate("photos/beach.jpg", root)?;
/// assert_eq!(safe.to_zip_name(), "photos/beach.jpg");
///
/// assert!(SafePath::validate("../etc/passwd", root).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates an archive entry name against `root`.
    ///
    /// `root` is expected to be canonical (as produced by
    /// [`TempWorkspace`](crate::TempWorkspace)). If the parent of the
    /// resolved path already exists it is canonicalized too, so a symlink
    /// planted inside the workspace cannot redirect the write.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::UnsafeEntry` naming the rejected entry.
    pub fn validate(name: &str, root: &Path) -> Result<Self> {
        let reject = |reason: &str| ScrubError::UnsafeEntry {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.contains('\0') {
            return Err(reject("path contains null bytes"));
        }

        let unified = name.replace('\\', "/");
        if unified.starts_with('/') {
            return Err(reject("absolute path"));
        }

        let mut normalized = PathBuf::new();
        let mut depth = 0;
        for component in Path::new(&unified).components() {
            match component {
                Component::Normal(part) => {
                    depth += 1;
                    normalized.push(part);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(reject("parent directory component"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(reject("absolute path"));
                }
            }
        }

        if depth == 0 {
            return Err(reject("empty path"));
        }
        if depth > MAX_PATH_DEPTH {
            return Err(reject(&format!(
                "path depth {depth} exceeds maximum {MAX_PATH_DEPTH}"
            )));
        }

        let resolved = root.join(&normalized);
        if let Some(parent) = resolved.parent() {
            match parent.canonicalize() {
                Ok(canonical_parent) => {
                    if !canonical_parent.starts_with(root) {
                        return Err(reject("resolves outside the workspace"));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // Parent not created yet; the lexical check above holds.
                }
                Err(e) => return Err(ScrubError::Io(e)),
            }
        }

        Ok(Self(normalized))
    }

    /// Returns the relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the path in ZIP form (forward slashes, no trailing slash).
    #[must_use]
    pub fn to_zip_name(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
