//! Clean command implementation.

use super::check_report;
use super::run_job;
use crate::cli::CleanArgs;
use crate::error::add_path_context;
use crate::error::convert_scrub_error;
use crate::output::OutputFormatter;
use crate::prompt::confirm_overwrite;
use anyhow::Result;
use metascrub_core::ArchiveJob;
use metascrub_core::ScrubError;
use metascrub_core::engine::MetadataEngine;
use std::path::Path;
use std::path::PathBuf;

/// `photos.zip` → `photos_clean.zip` in the same directory.
fn default_destination(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map_or_else(|| "archive".to_string(), |s| s.to_string_lossy().into_owned());
    archive.with_file_name(format!("{stem}_clean.zip"))
}

pub fn execute(
    args: &CleanArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
    quiet: bool,
    progress: bool,
) -> Result<()> {
    let scope = args.scope.to_scope()?;
    let destination = args
        .output
        .clone()
        .unwrap_or_else(|| default_destination(&args.archive));

    let job = add_path_context(
        ArchiveJob::clean(&args.archive, &destination, scope),
        &args.archive,
    )?;

    let overwrite = confirm_overwrite(&destination, args.force, quiet);
    if destination.exists() && !overwrite {
        return Err(convert_scrub_error(
            ScrubError::DestinationExists { path: destination },
            &args.archive,
        ));
    }

    let config = args.job.to_config().with_overwrite(overwrite);
    let report = run_job(&job, engine, &config, progress.then_some("Cleaning"))?;

    formatter.format_job_report(&report)?;
    check_report(&report, formatter)
}
