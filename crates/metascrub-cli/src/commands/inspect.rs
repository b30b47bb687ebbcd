//! Inspect command implementation.

use super::check_report;
use super::run_job;
use crate::cli::InspectArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::ArchiveJob;
use metascrub_core::engine::MetadataEngine;

pub fn execute(
    args: &InspectArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
    progress: bool,
) -> Result<()> {
    let job = add_path_context(ArchiveJob::inspect(&args.archive), &args.archive)?;
    let config = args.job.to_config();
    let report = run_job(&job, engine, &config, progress.then_some("Inspecting"))?;

    formatter.format_job_report(&report)?;
    check_report(&report, formatter)
}
