//! Metadata removal over extracted files.

use std::path::Path;
use std::path::PathBuf;

use crate::CancelToken;
use crate::JobConfig;
use crate::ProgressCallback;
use crate::Result;
use crate::batch::for_each_file;
use crate::engine::EngineSummary;
use crate::engine::FieldScope;
use crate::engine::MetadataEngine;
use crate::report::StripResult;
use crate::report::StripStatus;

/// Runs the engine over every file, in place, and returns one result per file
/// in input order.
///
/// `files` are relative to `root`. Engine failures never abort the pass: the
/// affected file is reported as [`StripStatus::Failed`] and left as it was.
///
/// # Errors
///
/// Only `ScrubError::Cancelled` (or a worker pool that cannot be started).
pub fn strip_files(
    root: &Path,
    files: &[PathBuf],
    engine: &dyn MetadataEngine,
    scope: &FieldScope,
    config: &JobConfig,
    cancel: &CancelToken,
    progress: &mut dyn ProgressCallback,
) -> Result<Vec<StripResult>> {
    for_each_file(files, config, cancel, progress, |relative| {
        strip_one(root, relative, engine, scope)
    })
}

fn strip_one(
    root: &Path,
    relative: &Path,
    engine: &dyn MetadataEngine,
    scope: &FieldScope,
) -> StripResult {
    let result = match engine.strip(&root.join(relative), scope, false) {
        Ok(summary) => classify(relative, &summary),
        Err(e) => StripResult::failed(relative.to_path_buf(), &e),
    };

    if result.status == StripStatus::Failed {
        tracing::warn!(
            file = %relative.display(),
            detail = result.error_detail.as_deref().unwrap_or_default(),
            "metadata removal failed"
        );
    } else {
        tracing::debug!(file = %relative.display(), status = %result.status, "stripped");
    }
    result
}

/// Maps an engine summary for a single file onto a status.
fn classify(relative: &Path, summary: &EngineSummary) -> StripResult {
    let (status, error_detail) = if summary.errors > 0 {
        (StripStatus::Failed, Some(summary.raw.clone()))
    } else if summary.updated > 0 {
        (StripStatus::Cleaned, None)
    } else {
        (StripStatus::Unchanged, None)
    };

    StripResult {
        relative_path: relative.to_path_buf(),
        status,
        error_detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let path = Path::new("a.jpg");
        let updated = EngineSummary::parse("    1 image files updated\n");
        assert_eq!(classify(path, &updated).status, StripStatus::Cleaned);

        let unchanged = EngineSummary::parse("    0 image files updated\n    1 image files unchanged\n");
        assert_eq!(classify(path, &unchanged).status, StripStatus::Unchanged);

        let errors = EngineSummary::parse("    0 image files updated\n    1 files weren't updated due to errors\n");
        let result = classify(path, &errors);
        assert_eq!(result.status, StripStatus::Failed);
        assert!(result.error_detail.unwrap().contains("due to errors"));
    }
}
