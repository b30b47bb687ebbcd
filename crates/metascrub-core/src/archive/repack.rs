//! Atomic ZIP repacking.

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::CancelToken;
use crate::JobConfig;
use crate::Result;
use crate::ScrubError;
use crate::types::ArchiveEntry;
use crate::types::CompressionHint;
use crate::types::EntryKind;

/// Rebuilds an archive at `destination` from the workspace at `root`.
///
/// Entries are written in the order given, with their recorded compression
/// method and (if [`JobConfig::preserve_permissions`] is set) their recorded
/// permission bits. The archive is assembled in a temporary file next to the
/// destination and moved into place only once complete, so a failed repack
/// never leaves a partial archive behind.
///
/// # Errors
///
/// - `ScrubError::DestinationExists` if the destination exists and
///   [`JobConfig::overwrite`] is not set
/// - `ScrubError::Repack` if the archive cannot be written or moved
/// - `ScrubError::Cancelled` if `cancel` fires between entries
pub fn repack_zip(
    root: &Path,
    entries: &[ArchiveEntry],
    destination: &Path,
    config: &JobConfig,
    cancel: &CancelToken,
) -> Result<()> {
    if !config.overwrite && destination.exists() {
        return Err(ScrubError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }

    let repack_error = |reason: String| ScrubError::Repack {
        path: destination.to_path_buf(),
        reason,
    };

    let dest_dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dest_dir).map_err(|e| repack_error(e.to_string()))?;

    {
        let mut zip = ZipWriter::new(BufWriter::new(tmp.as_file()));

        for entry in entries {
            cancel.check()?;

            let options = entry_options(entry, config);
            let name = entry.relative_path.to_zip_name();

            match entry.kind {
                EntryKind::Directory => {
                    zip.add_directory(format!("{name}/"), options)
                        .map_err(|e| repack_error(format!("failed to add directory {name}: {e}")))?;
                }
                EntryKind::File => {
                    let mut file = File::open(root.join(entry.path()))
                        .map_err(|e| repack_error(format!("cannot read {name}: {e}")))?;
                    zip.start_file(name.as_str(), options)
                        .map_err(|e| repack_error(format!("failed to start {name}: {e}")))?;
                    io::copy(&mut file, &mut zip)
                        .map_err(|e| repack_error(format!("failed to write {name}: {e}")))?;
                }
            }
        }

        let mut writer = zip
            .finish()
            .map_err(|e| repack_error(format!("failed to finish ZIP archive: {e}")))?;
        writer
            .flush()
            .map_err(|e| repack_error(e.to_string()))?;
    }

    set_archive_permissions(tmp.path()).map_err(|e| repack_error(e.to_string()))?;

    if config.overwrite {
        tmp.persist(destination)
            .map_err(|e| repack_error(e.error.to_string()))?;
    } else {
        tmp.persist_noclobber(destination).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                ScrubError::DestinationExists {
                    path: destination.to_path_buf(),
                }
            } else {
                repack_error(e.error.to_string())
            }
        })?;
    }

    tracing::debug!(destination = %destination.display(), entries = entries.len(), "repacked archive");
    Ok(())
}

fn entry_options(entry: &ArchiveEntry, config: &JobConfig) -> SimpleFileOptions {
    let options = match entry.compression_hint {
        CompressionHint::Stored => {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        }
        CompressionHint::Deflated => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(config.compression_level.map(i64::from)),
    };

    match entry.original_permissions {
        Some(mode) if config.preserve_permissions => options.unix_permissions(mode & 0o7777),
        _ => options,
    }
}

/// Temporary files are created owner-only; the finished archive gets the
/// usual file mode.
#[cfg(unix)]
fn set_archive_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_archive_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
