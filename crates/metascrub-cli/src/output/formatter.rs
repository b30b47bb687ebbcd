//! Output formatter trait for CLI results.

use anyhow::Result;
use metascrub_core::JobOutcome;
use metascrub_core::JobReport;
use metascrub_core::StripStatus;
use metascrub_core::api::GpsReading;
use metascrub_core::engine::EngineSummary;
use metascrub_core::engine::FieldScope;
use metascrub_core::engine::TagMap;
use metascrub_core::workspace::SweepReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the grouped metadata of one file
    fn format_metadata(&self, path: &Path, tags: &TagMap) -> Result<()>;

    /// Format the result of stripping one file
    fn format_strip_result(
        &self,
        path: &Path,
        scope: &FieldScope,
        status: StripStatus,
        output: Option<&Path>,
    ) -> Result<()>;

    /// Format GPS data of one file
    fn format_gps(&self, path: &Path, gps: &GpsReading) -> Result<()>;

    /// Format an engine write summary (tag edits, copies, folders)
    fn format_engine_summary(
        &self,
        operation: &str,
        path: &Path,
        summary: &EngineSummary,
    ) -> Result<()>;

    /// Format the report of an archive job
    fn format_job_report(&self, report: &JobReport) -> Result<()>;

    /// Format the result of a workspace sweep
    fn format_sweep(&self, dir: &Path, report: &SweepReport) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Partial,
    Error,
}

impl From<JobOutcome> for Status {
    fn from(outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Success => Self::Success,
            JobOutcome::PartialFailure => Self::Partial,
            JobOutcome::Failure => Self::Error,
        }
    }
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self::with_status(operation, Status::Success, data)
    }

    pub fn with_status(operation: impl Into<String>, status: Status, data: T) -> Self {
        Self {
            operation: operation.into(),
            status,
            data,
        }
    }
}

/// Shortens a value for display, keeping at most `max` characters.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut short: String = value.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
