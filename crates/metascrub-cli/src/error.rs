//! Error conversion utilities for CLI.
//!
//! Converts metascrub-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use metascrub_core::ScrubError;
use std::path::Path;

/// Converts `ScrubError` to a one-line cause naming `target`, plus a hint.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn convert_scrub_error(err: ScrubError, target: &Path) -> anyhow::Error {
    match err {
        ScrubError::EngineNotFound(detail) => {
            anyhow!(
                "ExifTool not found ({detail})\n\
                 HINT: Install ExifTool from https://exiftool.org or pass its path with --exiftool / METASCRUB_EXIFTOOL."
            )
        }
        ScrubError::EngineInvocation { path, detail } => {
            anyhow!("ExifTool failed on '{}': {}", path.display(), detail.trim())
        }
        ScrubError::ZipBomb {
            compressed,
            uncompressed,
            ratio,
        } => {
            anyhow!(
                "Security violation: Archive '{}' appears to be a zip bomb\n\
                 Compression ratio: {}:1 ({}KB → {}MB)\n\
                 HINT: Use --max-compression-ratio to allow higher ratios if legitimate.",
                target.display(),
                ratio as u64,
                compressed / 1024,
                uncompressed / 1024 / 1024
            )
        }
        ScrubError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{}': {}\n\
                 HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits.",
                target.display(),
                resource
            )
        }
        ScrubError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The file may be corrupted or not a ZIP archive.",
                target.display(),
                reason
            )
        }
        ScrubError::DestinationExists { path } => {
            anyhow!(
                "Output '{}' already exists\n\
                 HINT: Use --force to overwrite it.",
                path.display()
            )
        }
        ScrubError::DestinationIsSource { path } => {
            anyhow!(
                "Output '{}' is the input file\n\
                 HINT: Choose a different --output path.",
                path.display()
            )
        }
        ScrubError::Workspace { path, reason } => {
            anyhow!(
                "Cannot use temporary workspace '{}': {}\n\
                 HINT: Check free space and permissions of the temporary directory (TMPDIR).",
                path.display(),
                reason
            )
        }
        ScrubError::InvalidTagName(name) => {
            anyhow!(
                "Invalid tag {name:?}\n\
                 HINT: Tags look like Artist or XMP:Description; write values as TAG=VALUE."
            )
        }
        ScrubError::InvalidCoordinates(reason) => {
            anyhow!(
                "Invalid coordinates: {reason}\n\
                 HINT: Latitude must be within -90..90 and longitude within -180..180."
            )
        }
        ScrubError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", target.display(), io_err)
        }
        _ => anyhow::Error::from(err).context(format!("Error processing '{}'", target.display())),
    }
}

/// Adds path context to a core result.
pub fn add_path_context<T>(
    result: Result<T, ScrubError>,
    target: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_scrub_error(e, target))
}
