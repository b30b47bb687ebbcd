//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::truncate;
use anyhow::Result;
use console::Term;
use console::style;
use metascrub_core::JobOutcome;
use metascrub_core::JobReport;
use metascrub_core::ReportKind;
use metascrub_core::StripStatus;
use metascrub_core::api::GpsReading;
use metascrub_core::engine::EngineSummary;
use metascrub_core::engine::FieldScope;
use metascrub_core::engine::TagMap;
use metascrub_core::workspace::SweepReport;
use serde_json::Value;
use std::path::Path;

/// Longest value shown by `view` before it is shortened.
const MAX_VALUE_CHARS: usize = 160;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn headline(&self, ok: bool, text: &str) {
        if self.use_colors {
            let mark = if ok {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            self.line(&format!("{mark} {text}"));
        } else {
            self.line(text);
        }
    }

    fn section(&self, title: &str) {
        self.line("");
        if self.use_colors {
            self.line(&format!("{}", style(title).yellow().bold()));
        } else {
            self.line(title);
        }
    }

    fn value_text(value: &Value) -> String {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        truncate(&text, MAX_VALUE_CHARS)
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn clean_headline(outcome: JobOutcome) -> &'static str {
        match outcome {
            JobOutcome::Success => "Archive cleaned",
            JobOutcome::PartialFailure => "Archive cleaned with failures",
            JobOutcome::Failure => "Archive not cleaned",
        }
    }

    fn format_clean(&self, report: &JobReport, scope: &FieldScope) {
        self.headline(
            report.outcome != JobOutcome::Failure,
            Self::clean_headline(report.outcome),
        );
        self.line(&format!("  Status:       {}", report.outcome));
        self.line(&format!("  Source:       {}", report.source.display()));
        match &report.destination {
            Some(dest) => self.line(&format!("  Destination:  {}", dest.display())),
            None => self.line("  Destination:  (not written)"),
        }
        self.line(&format!("  Removed:      {scope}"));
        self.line(&format!(
            "  Cleaned:      {}",
            Self::format_number(report.count(StripStatus::Cleaned))
        ));
        self.line(&format!(
            "  Unchanged:    {}",
            Self::format_number(report.count(StripStatus::Unchanged))
        ));
        self.line(&format!(
            "  Failed:       {}",
            Self::format_number(report.count(StripStatus::Failed))
        ));

        if self.verbose {
            self.line(&format!("  Directories:  {}", report.directories));
            self.line(&format!("  Duration:     {:?}", report.duration));
        }

        if report.count(StripStatus::Failed) > 0 {
            self.section("Failed files (left unmodified):");
            for failure in report.failures() {
                let detail = failure.error_detail.as_deref().unwrap_or("unknown error");
                self.line(&format!(
                    "  - {}: {}",
                    failure.relative_path.display(),
                    detail.trim()
                ));
            }
        }
    }

    fn format_inspect(&self, report: &JobReport) {
        self.headline(
            report.outcome != JobOutcome::Failure,
            &format!("Archive inspected: {}", report.source.display()),
        );

        let width = report
            .findings
            .iter()
            .map(|f| f.relative_path.display().to_string().chars().count())
            .max()
            .unwrap_or(0);

        for finding in &report.findings {
            let path = finding.relative_path.display().to_string();
            let summary = match &finding.error_detail {
                Some(detail) => format!("error: {}", detail.trim()),
                None if finding.has_metadata => format!("{} fields", finding.field_count),
                None => "no metadata".to_string(),
            };
            self.line(&format!("  {path:<width$}  {summary}"));
        }

        self.line("");
        self.line(&format!(
            "  Files with metadata: {} of {} ({} fields)",
            Self::format_number(report.files_with_metadata()),
            Self::format_number(report.findings.len()),
            Self::format_number(report.total_fields())
        ));
        if self.verbose {
            self.line(&format!("  Duration: {:?}", report.duration));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_metadata(&self, path: &Path, tags: &TagMap) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(true, &format!("Metadata of {}", path.display()));
        for (group, value) in tags {
            if group == "SourceFile" {
                continue;
            }
            match value {
                Value::Object(fields) => {
                    self.section(&format!("[{group}]"));
                    for (tag, value) in fields {
                        self.line(&format!("  {tag}: {}", Self::value_text(value)));
                    }
                }
                other => self.line(&format!("  {group}: {}", Self::value_text(other))),
            }
        }

        Ok(())
    }

    fn format_strip_result(
        &self,
        path: &Path,
        scope: &FieldScope,
        status: StripStatus,
        output: Option<&Path>,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let written = output.unwrap_or(path);
        match status {
            StripStatus::Cleaned => self.headline(
                true,
                &format!("Removed {scope}: {}", written.display()),
            ),
            StripStatus::Unchanged => self.headline(
                true,
                &format!("Nothing to remove ({scope}): {}", written.display()),
            ),
            StripStatus::Failed => self.headline(false, &format!("Failed: {}", path.display())),
        }
        if let Some(output) = output {
            self.line(&format!("  Original kept: {}", path.display()));
            self.line(&format!("  Clean copy:    {}", output.display()));
        }

        Ok(())
    }

    fn format_gps(&self, path: &Path, gps: &GpsReading) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if gps.is_empty() {
            self.headline(true, &format!("No GPS data in {}", path.display()));
            return Ok(());
        }

        self.headline(true, &format!("GPS data of {}", path.display()));
        for (label, tag) in [
            ("Latitude", "GPSLatitude"),
            ("Longitude", "GPSLongitude"),
            ("Altitude", "GPSAltitude"),
            ("Speed", "GPSSpeed"),
            ("Date", "GPSDateStamp"),
            ("Time", "GPSTimeStamp"),
        ] {
            if let Some(value) = gps.text(tag) {
                self.line(&format!("  {label:<10} {value}"));
            }
        }
        if let Some(link) = gps.map_link() {
            self.line(&format!("  {:<10} {link}", "Map"));
        }

        Ok(())
    }

    fn format_engine_summary(
        &self,
        operation: &str,
        path: &Path,
        summary: &EngineSummary,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(
            summary.errors == 0,
            &format!("{operation}: {}", path.display()),
        );
        self.line(&format!("  {}", summary.describe()));
        if self.verbose && summary.directories > 0 {
            self.line(&format!("  Directories scanned: {}", summary.directories));
        }

        Ok(())
    }

    fn format_job_report(&self, report: &JobReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match &report.kind {
            ReportKind::Clean(scope) => self.format_clean(report, scope),
            ReportKind::Inspect => self.format_inspect(report),
        }

        if report.has_skipped() {
            self.section("Skipped entries:");
            for entry in &report.skipped {
                self.line(&format!("  - {}: {}", entry.name, entry.reason));
            }
        }

        if self.verbose {
            let trail: Vec<String> = report.states.iter().map(ToString::to_string).collect();
            self.line(&format!("  States: {}", trail.join(" → ")));
        }

        Ok(())
    }

    fn format_sweep(&self, dir: &Path, report: &SweepReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(
            report.failed.is_empty(),
            &format!(
                "Removed {} stale workspace(s) from {}",
                report.removed.len(),
                dir.display()
            ),
        );
        if self.verbose {
            for path in &report.removed {
                self.line(&format!("  - {}", path.display()));
            }
        }
        for (path, reason) in &report.failed {
            self.line(&format!("  cannot remove {}: {reason}", path.display()));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = Term::stderr().write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = Term::stderr().write_line(&format!("WARNING: {message}"));
        }
    }
}
