//! Job outcome reporting.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ScrubError;
use crate::engine::FieldScope;
use crate::job::JobState;

/// What the engine did to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripStatus {
    /// The engine removed at least one field.
    Cleaned,
    /// The engine had nothing to remove.
    Unchanged,
    /// The engine failed on this file; the file is kept in its prior state.
    Failed,
}

impl fmt::Display for StripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cleaned => "cleaned",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
        })
    }
}

/// Per-file result of a strip pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripResult {
    /// Path of the file relative to the archive root.
    pub relative_path: PathBuf,
    /// What happened.
    pub status: StripStatus,
    /// Engine diagnostics, set only for `Failed`.
    pub error_detail: Option<String>,
}

impl StripResult {
    pub(crate) fn failed(relative_path: PathBuf, err: &ScrubError) -> Self {
        Self {
            relative_path,
            status: StripStatus::Failed,
            error_detail: Some(err.to_string()),
        }
    }
}

/// Per-file result of an inspection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionFinding {
    /// Path of the file relative to the archive root.
    pub relative_path: PathBuf,
    /// `true` if at least one embedded field was found.
    pub has_metadata: bool,
    /// Number of embedded fields.
    pub field_count: usize,
    /// Set when the engine could not read the file; the counts are then zero.
    pub error_detail: Option<String>,
}

/// An archive entry left out of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Aggregate outcome of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobOutcome {
    /// Every file was processed.
    Success,
    /// Some files failed; the rest were processed.
    PartialFailure,
    /// Nothing useful was produced.
    Failure,
}

impl JobOutcome {
    /// Derives the outcome of a strip pass: `Failure` only when files exist
    /// and every one failed.
    #[must_use]
    pub fn from_results(results: &[StripResult]) -> Self {
        let failed = results
            .iter()
            .filter(|r| r.status == StripStatus::Failed)
            .count();
        if failed == 0 {
            Self::Success
        } else if failed == results.len() {
            Self::Failure
        } else {
            Self::PartialFailure
        }
    }

    /// Derives the outcome of an inspection pass.
    #[must_use]
    pub fn from_findings(findings: &[InspectionFinding]) -> Self {
        let failed = findings.iter().filter(|f| f.error_detail.is_some()).count();
        if failed == 0 {
            Self::Success
        } else if failed == findings.len() {
            Self::Failure
        } else {
            Self::PartialFailure
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::PartialFailure => "partial failure",
            Self::Failure => "failure",
        })
    }
}

/// Which pipeline produced a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Extract, strip and repack.
    Clean(FieldScope),
    /// Extract and count fields.
    Inspect,
}

/// Report of one archive job.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Pipeline that ran.
    pub kind: ReportKind,
    /// Aggregate outcome.
    pub outcome: JobOutcome,
    /// Archive that was read.
    pub source: PathBuf,
    /// Archive that was written, if any.
    pub destination: Option<PathBuf>,
    /// Strip results in archive order (clean jobs).
    pub results: Vec<StripResult>,
    /// Inspection findings in archive order (inspect jobs).
    pub findings: Vec<InspectionFinding>,
    /// Entries that were not processed.
    pub skipped: Vec<SkippedEntry>,
    /// Number of directory entries carried through.
    pub directories: usize,
    /// Workspace cleanup problem, if the temporary directory could not be
    /// fully removed.
    pub cleanup_error: Option<String>,
    /// States the job passed through, ending with `Terminal`.
    pub states: Vec<JobState>,
    /// Wall-clock time of the job.
    pub duration: Duration,
}

impl JobReport {
    pub(crate) fn new(kind: ReportKind, source: PathBuf) -> Self {
        Self {
            kind,
            outcome: JobOutcome::Success,
            source,
            destination: None,
            results: Vec::new(),
            findings: Vec::new(),
            skipped: Vec::new(),
            directories: 0,
            cleanup_error: None,
            states: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Number of results with the given status.
    #[must_use]
    pub fn count(&self, status: StripStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Results that failed.
    pub fn failures(&self) -> impl Iterator<Item = &StripResult> {
        self.results
            .iter()
            .filter(|r| r.status == StripStatus::Failed)
    }

    /// Number of inspected files carrying metadata.
    #[must_use]
    pub fn files_with_metadata(&self) -> usize {
        self.findings.iter().filter(|f| f.has_metadata).count()
    }

    /// Sum of field counts over all findings.
    #[must_use]
    pub fn total_fields(&self) -> usize {
        self.findings.iter().map(|f| f.field_count).sum()
    }

    /// Returns whether any entries were skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Callback trait for progress reporting during archive jobs.
///
/// With several workers, calls arrive one at a time from pool threads and
/// the start and complete calls of different files may interleave. The trait
/// requires `Send` so the job can hand it to its worker pool behind a lock.
///
/// # Examples
///
/// ```
/// use metascrub_core::ProgressCallback;
/// use std::path::Path;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("Processing {}/{}: {}", current, total, path.display());
///     }
///
///     fn on_entry_complete(&mut self, path: &Path) {
///         println!("Completed: {}", path.display());
///     }
///
///     fn on_complete(&mut self) {
///         println!("Job complete");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when the engine starts on a file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the file relative to the archive root
    /// * `total` - Total number of files in the job
    /// * `current` - Current file number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called when a file has been processed, successfully or not.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the last file.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
