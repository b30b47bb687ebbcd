//! Read-only metadata counting over extracted files.

use std::path::Path;
use std::path::PathBuf;

use crate::CancelToken;
use crate::JobConfig;
use crate::ProgressCallback;
use crate::Result;
use crate::batch::for_each_file;
use crate::engine::MetadataEngine;
use crate::report::InspectionFinding;

/// Counts embedded metadata fields of every file, in input order.
///
/// Files are never modified. A file the engine cannot read gets a finding
/// with zero fields and the engine's diagnostics in `error_detail`.
///
/// # Errors
///
/// Only `ScrubError::Cancelled` (or a worker pool that cannot be started).
pub fn inspect_files(
    root: &Path,
    files: &[PathBuf],
    engine: &dyn MetadataEngine,
    config: &JobConfig,
    cancel: &CancelToken,
    progress: &mut dyn ProgressCallback,
) -> Result<Vec<InspectionFinding>> {
    for_each_file(files, config, cancel, progress, |relative| {
        match engine.field_count(&root.join(relative)) {
            Ok(field_count) => InspectionFinding {
                relative_path: relative.to_path_buf(),
                has_metadata: field_count > 0,
                field_count,
                error_detail: None,
            },
            Err(e) => {
                tracing::warn!(file = %relative.display(), error = %e, "cannot read metadata");
                InspectionFinding {
                    relative_path: relative.to_path_buf(),
                    has_metadata: false,
                    field_count: 0,
                    error_detail: Some(e.to_string()),
                }
            }
        }
    })
}
