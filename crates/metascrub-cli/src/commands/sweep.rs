//! Sweep command implementation and the start-up sweep.

use crate::cli::SweepArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::sweep_stale;
use metascrub_core::workspace::STALE_AFTER;
use std::env;
use std::time::Duration;

pub fn execute(args: &SweepArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(env::temp_dir);
    let older_than = Duration::from_secs(args.older_than.saturating_mul(3600));

    let report = add_path_context(sweep_stale(&dir, older_than), &dir)?;
    formatter.format_sweep(&dir, &report)
}

/// Best-effort removal of workspaces abandoned by crashed runs.
pub fn startup() {
    let dir = env::temp_dir();
    match sweep_stale(&dir, STALE_AFTER) {
        Ok(report) if !report.removed.is_empty() => {
            tracing::info!(count = report.removed.len(), dir = %dir.display(), "swept stale workspaces");
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "start-up sweep skipped"),
    }
}
