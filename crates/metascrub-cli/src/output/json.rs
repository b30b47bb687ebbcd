//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::Status;
use anyhow::Result;
use metascrub_core::JobReport;
use metascrub_core::ReportKind;
use metascrub_core::StripStatus;
use metascrub_core::api::GpsReading;
use metascrub_core::engine::EngineSummary;
use metascrub_core::engine::FieldScope;
use metascrub_core::engine::TagMap;
use metascrub_core::workspace::SweepReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FileOutput {
    path: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct FindingOutput {
    path: String,
    has_metadata: bool,
    field_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct SkippedOutput {
    name: String,
    reason: String,
}

#[derive(Serialize)]
struct JobOutput {
    outcome: String,
    source: String,
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleaned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unchanged: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<FileOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    findings: Vec<FindingOutput>,
    skipped: Vec<SkippedOutput>,
    directories: usize,
    states: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleanup_error: Option<String>,
    duration_ms: u128,
}

impl JobOutput {
    fn from_report(report: &JobReport) -> Self {
        let (scope, counts) = match &report.kind {
            ReportKind::Clean(scope) => (
                Some(scope.to_string()),
                Some((
                    report.count(StripStatus::Cleaned),
                    report.count(StripStatus::Unchanged),
                    report.count(StripStatus::Failed),
                )),
            ),
            ReportKind::Inspect => (None, None),
        };

        Self {
            outcome: report.outcome.to_string(),
            source: report.source.display().to_string(),
            destination: report.destination.as_ref().map(|p| p.display().to_string()),
            scope,
            cleaned: counts.map(|c| c.0),
            unchanged: counts.map(|c| c.1),
            failed: counts.map(|c| c.2),
            files: report
                .results
                .iter()
                .map(|r| FileOutput {
                    path: r.relative_path.display().to_string(),
                    status: r.status.to_string(),
                    error: r.error_detail.clone(),
                })
                .collect(),
            findings: report
                .findings
                .iter()
                .map(|f| FindingOutput {
                    path: f.relative_path.display().to_string(),
                    has_metadata: f.has_metadata,
                    field_count: f.field_count,
                    error: f.error_detail.clone(),
                })
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedOutput {
                    name: s.name.clone(),
                    reason: s.reason.clone(),
                })
                .collect(),
            directories: report.directories,
            states: report.states.iter().map(ToString::to_string).collect(),
            cleanup_error: report.cleanup_error.clone(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_metadata(&self, path: &Path, tags: &TagMap) -> Result<()> {
        #[derive(Serialize)]
        struct MetadataOutput<'a> {
            path: String,
            metadata: &'a TagMap,
        }

        let data = MetadataOutput {
            path: path.display().to_string(),
            metadata: tags,
        };
        Self::output(&JsonOutput::success("view", data))
    }

    fn format_strip_result(
        &self,
        path: &Path,
        scope: &FieldScope,
        status: StripStatus,
        output: Option<&Path>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct StripOutput {
            path: String,
            output: Option<String>,
            scope: String,
            result: String,
        }

        let data = StripOutput {
            path: path.display().to_string(),
            output: output.map(|p| p.display().to_string()),
            scope: scope.to_string(),
            result: status.to_string(),
        };
        Self::output(&JsonOutput::success("strip", data))
    }

    fn format_gps(&self, path: &Path, gps: &GpsReading) -> Result<()> {
        #[derive(Serialize)]
        struct GpsOutput<'a> {
            path: String,
            latitude: Option<f64>,
            longitude: Option<f64>,
            map_link: Option<String>,
            tags: &'a TagMap,
        }

        let data = GpsOutput {
            path: path.display().to_string(),
            latitude: gps.latitude(),
            longitude: gps.longitude(),
            map_link: gps.map_link(),
            tags: &gps.tags,
        };
        Self::output(&JsonOutput::success("gps", data))
    }

    fn format_engine_summary(
        &self,
        operation: &str,
        path: &Path,
        summary: &EngineSummary,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct SummaryOutput {
            path: String,
            updated: usize,
            unchanged: usize,
            failed: usize,
        }

        let data = SummaryOutput {
            path: path.display().to_string(),
            updated: summary.updated,
            unchanged: summary.unchanged,
            failed: summary.errors,
        };
        let status = if summary.errors == 0 {
            Status::Success
        } else if summary.updated + summary.unchanged > 0 {
            Status::Partial
        } else {
            Status::Error
        };
        Self::output(&JsonOutput::with_status(operation, status, data))
    }

    fn format_job_report(&self, report: &JobReport) -> Result<()> {
        let operation = match report.kind {
            ReportKind::Clean(_) => "clean",
            ReportKind::Inspect => "inspect",
        };
        Self::output(&JsonOutput::with_status(
            operation,
            Status::from(report.outcome),
            JobOutput::from_report(report),
        ))
    }

    fn format_sweep(&self, dir: &Path, report: &SweepReport) -> Result<()> {
        #[derive(Serialize)]
        struct SweepOutput {
            dir: String,
            removed: Vec<String>,
            failed: Vec<SkippedOutput>,
        }

        let data = SweepOutput {
            dir: dir.display().to_string(),
            removed: report.removed.iter().map(|p| p.display().to_string()).collect(),
            failed: report
                .failed
                .iter()
                .map(|(path, reason)| SkippedOutput {
                    name: path.display().to_string(),
                    reason: reason.clone(),
                })
                .collect(),
        };
        let status = if report.failed.is_empty() {
            Status::Success
        } else {
            Status::Partial
        };
        Self::output(&JsonOutput::with_status("sweep", status, data))
    }

    fn format_warning(&self, message: &str) {
        // stdout carries exactly one result document
        let _ = writeln!(io::stderr(), "WARNING: {message}");
    }
}
