//! Guarded ZIP extraction.

use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::CancelToken;
use crate::ExtractionLimits;
use crate::Result;
use crate::ScrubError;
use crate::error::QuotaResource;
use crate::report::SkippedEntry;
use crate::types::ArchiveEntry;
use crate::types::CompressionHint;
use crate::types::EntryKind;
use crate::types::SafePath;

use super::is_symlink_mode;

/// Entries unpacked into a workspace, in archive order.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Extracted files and directories.
    pub entries: Vec<ArchiveEntry>,
    /// Entries that were left out.
    pub skipped: Vec<SkippedEntry>,
}

impl Extraction {
    /// Iterates over extracted regular files.
    pub fn files(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    /// Number of extracted directory entries.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.entries.len() - self.files().count()
    }
}

/// Unpacks `source` into `root`.
///
/// `root` must be a canonical, empty directory. Entries that would escape it,
/// symbolic links, and names repeated within the archive are skipped and
/// reported. Exceeding any of the `limits` aborts the extraction.
///
/// # Errors
///
/// - `ScrubError::InvalidArchive` if `source` is not a readable ZIP archive
/// - `ScrubError::QuotaExceeded` or `ScrubError::ZipBomb` if a limit is hit
/// - `ScrubError::Cancelled` if `cancel` fires between entries
/// - `ScrubError::Io` if writing to the workspace fails
pub fn extract_zip(
    source: &Path,
    root: &Path,
    limits: &ExtractionLimits,
    cancel: &CancelToken,
) -> Result<Extraction> {
    let file = File::open(source)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ScrubError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    if archive.len() > limits.max_file_count {
        return Err(ScrubError::QuotaExceeded {
            resource: QuotaResource::FileCount {
                current: archive.len(),
                max: limits.max_file_count,
            },
        });
    }

    let mut extraction = Extraction::default();
    let mut seen: HashMap<PathBuf, EntryKind> = HashMap::new();
    let mut total_size: u64 = 0;

    for i in 0..archive.len() {
        cancel.check()?;

        let mut entry = archive.by_index(i).map_err(|e| {
            ScrubError::InvalidArchive(format!("failed to read ZIP entry {i}: {e}"))
        })?;
        let name = entry.name().to_string();
        let mode = entry.unix_mode();

        if mode.is_some_and(is_symlink_mode) {
            skip(&mut extraction, &name, "symbolic link");
            continue;
        }

        let safe = match SafePath::validate(&name, root) {
            Ok(safe) => safe,
            Err(ScrubError::UnsafeEntry { reason, .. }) => {
                skip(&mut extraction, &name, &reason);
                continue;
            }
            Err(e) => return Err(e),
        };

        let kind = if entry.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        if seen.contains_key(safe.as_path()) {
            skip(&mut extraction, &name, "duplicate entry");
            continue;
        }
        if safe
            .as_path()
            .ancestors()
            .skip(1)
            .any(|ancestor| seen.get(ancestor) == Some(&EntryKind::File))
        {
            skip(&mut extraction, &name, "parent is a file entry");
            continue;
        }

        // Parents created for earlier entries are not in `seen`.
        let target = root.join(safe.as_path());
        if let Some(reason) = conflict_on_disk(&target, kind) {
            skip(&mut extraction, &name, reason);
            continue;
        }

        match kind {
            EntryKind::Directory => {
                fs::create_dir_all(&target)?;
            }
            EntryKind::File => {
                check_entry_size(entry.size(), entry.compressed_size(), total_size, limits)?;
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let written = copy_capped(&mut entry, &target, limits.max_file_size)?;
                total_size = add_size(total_size, written, limits)?;
            }
        }

        tracing::trace!(entry = %name, ?kind, "extracted entry");
        seen.insert(safe.as_path().to_path_buf(), kind);
        extraction.entries.push(ArchiveEntry {
            relative_path: safe,
            kind,
            original_permissions: mode,
            compression_hint: CompressionHint::from_method(entry.compression()),
        });
    }

    tracing::debug!(
        entries = extraction.entries.len(),
        skipped = extraction.skipped.len(),
        bytes = total_size,
        "extraction complete"
    );
    Ok(extraction)
}

fn skip(extraction: &mut Extraction, name: &str, reason: &str) {
    tracing::warn!(entry = %name, reason, "skipping archive entry");
    extraction.skipped.push(SkippedEntry {
        name: name.to_string(),
        reason: reason.to_string(),
    });
}

fn conflict_on_disk(target: &Path, kind: EntryKind) -> Option<&'static str> {
    let existing = fs::symlink_metadata(target).ok()?;
    match kind {
        EntryKind::File if existing.is_dir() => Some("conflicts with an existing directory"),
        EntryKind::File => Some("conflicts with an existing file"),
        EntryKind::Directory if existing.is_dir() => None,
        EntryKind::Directory => Some("conflicts with an existing file"),
    }
}

/// Checks the sizes an entry declares before any of it is written.
fn check_entry_size(
    size: u64,
    compressed: u64,
    total_so_far: u64,
    limits: &ExtractionLimits,
) -> Result<()> {
    if size > limits.max_file_size {
        return Err(ScrubError::QuotaExceeded {
            resource: QuotaResource::FileSize {
                size,
                max: limits.max_file_size,
            },
        });
    }

    if compressed > 0 {
        let ratio = size as f64 / compressed as f64;
        if ratio > limits.max_compression_ratio {
            return Err(ScrubError::ZipBomb {
                compressed,
                uncompressed: size,
                ratio,
            });
        }
    }

    add_size(total_so_far, size, limits).map(|_| ())
}

fn add_size(total: u64, size: u64, limits: &ExtractionLimits) -> Result<u64> {
    let new_total = total
        .checked_add(size)
        .ok_or(ScrubError::QuotaExceeded {
            resource: QuotaResource::IntegerOverflow,
        })?;
    if new_total > limits.max_total_size {
        return Err(ScrubError::QuotaExceeded {
            resource: QuotaResource::TotalSize {
                current: new_total,
                max: limits.max_total_size,
            },
        });
    }
    Ok(new_total)
}

/// Copies at most `max` bytes; the declared size in the archive header is
/// not trusted.
fn copy_capped(reader: &mut impl Read, target: &Path, max: u64) -> Result<u64> {
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)?;
    let written = io::copy(&mut reader.take(max.saturating_add(1)), &mut out)?;
    if written > max {
        return Err(ScrubError::QuotaExceeded {
            resource: QuotaResource::FileSize {
                size: written,
                max,
            },
        });
    }
    Ok(written)
}
