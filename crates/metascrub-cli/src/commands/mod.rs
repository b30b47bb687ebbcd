//! Subcommand implementations.

pub mod batch;
pub mod clean;
pub mod completion;
pub mod copy_tags;
pub mod edit;
pub mod gps;
pub mod inspect;
pub mod strip;
pub mod sweep;
pub mod view;

use crate::cli::Cli;
use crate::error::add_path_context;
use crate::error::convert_scrub_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use metascrub_core::ArchiveJob;
use metascrub_core::CancelToken;
use metascrub_core::JobConfig;
use metascrub_core::JobOutcome;
use metascrub_core::JobReport;
use metascrub_core::NoopProgress;
use metascrub_core::engine::ExifTool;
use metascrub_core::engine::MetadataEngine;
use metascrub_core::engine::exiftool::DEFAULT_BINARY;
use metascrub_core::types::TagAssignment;
use std::path::Path;

/// Resolves the engine named by `--exiftool`, or `exiftool` on `PATH`.
pub fn engine(cli: &Cli) -> Result<ExifTool> {
    let program = cli
        .exiftool
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_BINARY));
    let engine = ExifTool::with_program(program).map_err(|e| convert_scrub_error(e, program))?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        match engine.version() {
            Ok(version) => tracing::debug!(%version, bin = %engine.binary().display(), "using exiftool"),
            Err(e) => tracing::debug!(error = %e, "cannot query exiftool version"),
        }
    }
    Ok(engine)
}

/// Runs an archive job with a progress bar when `label` is set.
pub fn run_job(
    job: &ArchiveJob,
    engine: &dyn MetadataEngine,
    config: &JobConfig,
    label: Option<&str>,
) -> Result<JobReport> {
    let cancel = CancelToken::new();
    let result = match label {
        Some(label) => {
            let mut progress = CliProgress::new(label);
            job.run(engine, config, &cancel, &mut progress)
        }
        None => job.run(engine, config, &cancel, &mut NoopProgress),
    };
    add_path_context(result, job.source())
}

/// Turns a finished report into the process result: cleanup problems and
/// total failure are errors, a partial failure is not.
pub fn check_report(report: &JobReport, formatter: &dyn OutputFormatter) -> Result<()> {
    if let Some(cleanup) = &report.cleanup_error {
        formatter.format_warning(&format!("temporary files were not fully removed: {cleanup}"));
        bail!(
            "Cleanup of the temporary workspace failed for '{}'\n\
             HINT: Run `metascrub sweep --older-than 0` to remove leftover workspaces.",
            report.source.display()
        );
    }
    if report.outcome == JobOutcome::Failure {
        bail!("No file in '{}' could be processed", report.source.display());
    }
    Ok(())
}

/// Parses `TAG=VALUE` arguments, rejecting the first invalid one.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<TagAssignment>> {
    raw.iter()
        .map(|s| TagAssignment::parse(s).map_err(|e| convert_scrub_error(e, Path::new(s))))
        .collect()
}
