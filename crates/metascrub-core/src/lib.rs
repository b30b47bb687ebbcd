//! Metadata scrubbing for files and ZIP archives via an external engine.
//!
//! `metascrub-core` never parses metadata itself. Every read and write goes
//! through a [`MetadataEngine`](engine::MetadataEngine), normally
//! [`ExifTool`](engine::ExifTool). For archives it runs a job pipeline:
//! extract into a private [`TempWorkspace`], run the engine over every
//! extracted file, repack into a new archive, and delete the workspace on
//! every exit path.
//!
//! # Examples
//!
//! ```no_run
//! use metascrub_core::ArchiveJob;
//! use metascrub_core::CancelToken;
//! use metascrub_core::JobConfig;
//! use metascrub_core::NoopProgress;
//! use metascrub_core::engine::ExifTool;
//! use metascrub_core::engine::FieldScope;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ExifTool::locate()?;
//! let job = ArchiveJob::clean("photos.zip", "photos_clean.zip", FieldScope::All)?;
//! let report = job.run(&engine, &JobConfig::default(), &CancelToken::new(), &mut NoopProgress)?;
//! println!("{} ({} files)", report.outcome, report.results.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
mod batch;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod job;
pub mod report;
pub mod strip;
#[doc(hidden)]
pub mod test_utils;
pub mod types;
pub mod workspace;

pub use cancel::CancelToken;
pub use config::ExtractionLimits;
pub use config::JobConfig;
pub use error::QuotaResource;
pub use error::Result;
pub use error::ScrubError;
pub use job::ArchiveJob;
pub use job::JobMode;
pub use job::JobState;
pub use report::InspectionFinding;
pub use report::JobOutcome;
pub use report::JobReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::ReportKind;
pub use report::SkippedEntry;
pub use report::StripResult;
pub use report::StripStatus;
pub use workspace::TempWorkspace;
pub use workspace::sweep_stale;
