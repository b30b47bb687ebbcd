//! Archive job orchestration.

use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::CancelToken;
use crate::JobConfig;
use crate::ProgressCallback;
use crate::Result;
use crate::ScrubError;
use crate::TempWorkspace;
use crate::archive::extract_zip;
use crate::archive::repack_zip;
use crate::engine::FieldScope;
use crate::engine::MetadataEngine;
use crate::inspect::inspect_files;
use crate::report::JobOutcome;
use crate::report::JobReport;
use crate::report::ReportKind;
use crate::strip::strip_files;

/// What a job does with the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobMode {
    /// Strip `scope` from every file and write the result to `destination`.
    Clean {
        /// Output archive.
        destination: PathBuf,
        /// Fields to remove.
        scope: FieldScope,
    },
    /// Count metadata fields; nothing is written.
    Inspect,
}

/// Steps a job passes through.
///
/// Every job that acquired a workspace passes `WorkspaceReleased` before it
/// terminates, whichever step it stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Job validated, nothing on disk yet.
    Created,
    /// Workspace directory exists.
    WorkspaceAcquired,
    /// Source archive unpacked into the workspace.
    Extracted,
    /// Engine ran over every file (clean jobs).
    Stripped,
    /// Engine queried every file (inspect jobs).
    Inspected,
    /// Destination archive written.
    Repacked,
    /// Workspace removed.
    WorkspaceReleased,
    /// Job finished with the given outcome.
    Terminal(JobOutcome),
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::WorkspaceAcquired => f.write_str("workspace acquired"),
            Self::Extracted => f.write_str("extracted"),
            Self::Stripped => f.write_str("stripped"),
            Self::Inspected => f.write_str("inspected"),
            Self::Repacked => f.write_str("repacked"),
            Self::WorkspaceReleased => f.write_str("workspace released"),
            Self::Terminal(outcome) => write!(f, "terminal ({outcome})"),
        }
    }
}

/// One request to clean or inspect one archive.
///
/// Immutable once created. Running it owns a fresh
/// [`TempWorkspace`] that never outlives [`run`](Self::run).
///
/// # Examples
///
/// ```no_run
/// use metascrub_core::ArchiveJob;
/// use metascrub_core::CancelToken;
/// use metascrub_core::JobConfig;
/// use metascrub_core::NoopProgress;
/// use metascrub_core::engine::ExifTool;
/// use metascrub_core::engine::FieldScope;
///
/// # fn main() -> Result<(), metascrub_core::ScrubError> {
/// let engine = ExifTool::locate()?;
/// let job = ArchiveJob::clean("photos.zip", "photos_clean.zip", FieldScope::All)?;
/// let report = job.run(&engine, &JobConfig::default(), &CancelToken::new(), &mut NoopProgress)?;
/// println!("{}", report.outcome);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    source: PathBuf,
    mode: JobMode,
}

impl ArchiveJob {
    /// Creates a clean job.
    ///
    /// # Errors
    ///
    /// - `ScrubError::Io` if the source does not exist or is not a file
    /// - `ScrubError::DestinationIsSource` if both paths name the same file
    pub fn clean(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        scope: FieldScope,
    ) -> Result<Self> {
        let source = source.into();
        let destination = destination.into();
        check_source(&source)?;

        if same_file(&source, &destination) {
            return Err(ScrubError::DestinationIsSource { path: destination });
        }

        Ok(Self {
            source,
            mode: JobMode::Clean { destination, scope },
        })
    }

    /// Creates an inspect job.
    ///
    /// # Errors
    ///
    /// Returns `ScrubError::Io` if the source does not exist or is not a file.
    pub fn inspect(source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        check_source(&source)?;
        Ok(Self {
            source,
            mode: JobMode::Inspect,
        })
    }

    /// Source archive.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Job mode.
    #[must_use]
    pub fn mode(&self) -> &JobMode {
        &self.mode
    }

    /// Runs the job to completion.
    ///
    /// Per-file engine failures and skipped entries are part of the returned
    /// report. A clean job in which every file failed reports
    /// [`JobOutcome::Failure`] and writes no destination.
    ///
    /// # Errors
    ///
    /// Job-level failures (invalid archive, limits, repack, cancellation,
    /// workspace creation). The workspace is released before the error is
    /// returned.
    pub fn run(
        &self,
        engine: &dyn MetadataEngine,
        config: &JobConfig,
        cancel: &CancelToken,
        progress: &mut dyn ProgressCallback,
    ) -> Result<JobReport> {
        let start = Instant::now();
        let kind = match &self.mode {
            JobMode::Clean { scope, .. } => ReportKind::Clean(scope.clone()),
            JobMode::Inspect => ReportKind::Inspect,
        };
        let mut report = JobReport::new(kind, self.source.clone());
        let mut trail = StateTrail::default();
        trail.enter(JobState::Created);

        tracing::info!(source = %self.source.display(), "starting archive job");

        let workspace = TempWorkspace::acquire(config)?;
        trail.enter(JobState::WorkspaceAcquired);

        let result = self.execute(&workspace, engine, config, cancel, progress, &mut report, &mut trail);

        let released = workspace.release();
        trail.enter(JobState::WorkspaceReleased);

        match (result, released) {
            (Ok(()), Ok(())) => {}
            (Ok(()), Err(e)) => {
                tracing::error!(error = %e, "workspace cleanup failed");
                report.cleanup_error = Some(e.to_string());
            }
            (Err(e), released) => {
                if let Err(cleanup) = released {
                    tracing::error!(error = %cleanup, "workspace cleanup failed");
                }
                trail.enter(JobState::Terminal(JobOutcome::Failure));
                tracing::warn!(error = %e, "archive job failed");
                return Err(e);
            }
        }

        trail.enter(JobState::Terminal(report.outcome));
        report.states = trail.0;
        report.duration = start.elapsed();

        tracing::info!(
            outcome = %report.outcome,
            duration = ?report.duration,
            "archive job finished"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        workspace: &TempWorkspace,
        engine: &dyn MetadataEngine,
        config: &JobConfig,
        cancel: &CancelToken,
        progress: &mut dyn ProgressCallback,
        report: &mut JobReport,
        trail: &mut StateTrail,
    ) -> Result<()> {
        let root = workspace.root();
        let extraction = extract_zip(&self.source, root, &config.limits, cancel)?;
        trail.enter(JobState::Extracted);

        report.directories = extraction.directory_count();
        let files: Vec<PathBuf> = extraction
            .files()
            .map(|entry| entry.path().to_path_buf())
            .collect();

        match &self.mode {
            JobMode::Clean { destination, scope } => {
                report.results =
                    strip_files(root, &files, engine, scope, config, cancel, progress)?;
                trail.enter(JobState::Stripped);
                report.outcome = JobOutcome::from_results(&report.results);

                if report.outcome == JobOutcome::Failure {
                    tracing::warn!("every file failed, no archive written");
                } else {
                    repack_zip(root, &extraction.entries, destination, config, cancel)?;
                    trail.enter(JobState::Repacked);
                    report.destination = Some(destination.clone());
                }
            }
            JobMode::Inspect => {
                report.findings = inspect_files(root, &files, engine, config, cancel, progress)?;
                trail.enter(JobState::Inspected);
                report.outcome = JobOutcome::from_findings(&report.findings);
            }
        }

        report.skipped = extraction.skipped;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StateTrail(Vec<JobState>);

impl StateTrail {
    fn enter(&mut self, state: JobState) {
        tracing::debug!(%state, "job state");
        self.0.push(state);
    }
}

pub(crate) fn check_source(source: &Path) -> Result<()> {
    let metadata = std::fs::metadata(source)?;
    if metadata.is_file() {
        Ok(())
    } else {
        Err(ScrubError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", source.display()),
        )))
    }
}

/// Compares canonical paths; a destination that does not exist yet is
/// resolved through its parent directory.
pub(crate) fn same_file(source: &Path, destination: &Path) -> bool {
    let Ok(source) = source.canonicalize() else {
        return false;
    };
    if let Ok(destination) = destination.canonicalize() {
        return source == destination;
    }

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), destination.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name) == source,
        _ => false,
    }
}
