//! CLI argument parsing using clap.

use anyhow::Result;
use clap::ArgGroup;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use metascrub_core::ExtractionLimits;
use metascrub_core::JobConfig;
use metascrub_core::engine::FieldScope;
use metascrub_core::types::TagName;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metascrub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// ExifTool executable (path or name on PATH)
    #[arg(long, global = true, env = "METASCRUB_EXIFTOOL", value_name = "PATH")]
    pub exiftool: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all metadata of a file, grouped
    View(ViewArgs),
    /// Remove metadata from a file
    Strip(StripArgs),
    /// Show, set or remove GPS coordinates
    #[command(subcommand)]
    Gps(GpsCommand),
    /// Write one or more tags to a file
    Edit(EditArgs),
    /// Strip or write metadata for every file in a folder
    Batch(BatchArgs),
    /// Copy all metadata from one file to another
    CopyTags(CopyTagsArgs),
    /// Strip metadata from every file inside a ZIP archive
    Clean(CleanArgs),
    /// Report which files inside a ZIP archive carry metadata
    Inspect(InspectArgs),
    /// Remove workspaces left behind by interrupted jobs
    Sweep(SweepArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Commands that run an archive job sweep stale workspaces first.
    pub const fn sweeps_on_startup(&self) -> bool {
        matches!(self, Self::Clean(_) | Self::Inspect(_))
    }
}

#[derive(clap::Args)]
pub struct ViewArgs {
    /// File to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Which fields to remove; everything when neither flag is given.
#[derive(clap::Args)]
pub struct ScopeArgs {
    /// Remove only GPS data
    #[arg(long, conflicts_with = "tag")]
    pub gps: bool,

    /// Remove only this tag (e.g. Artist, XMP:Description)
    #[arg(long, value_name = "NAME")]
    pub tag: Option<String>,
}

impl ScopeArgs {
    pub fn to_scope(&self) -> Result<FieldScope> {
        Ok(match &self.tag {
            Some(name) => FieldScope::Tag(TagName::new(name.as_str())?),
            None if self.gps => FieldScope::Gps,
            None => FieldScope::All,
        })
    }
}

#[derive(clap::Args)]
pub struct StripArgs {
    /// File to clean
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Write a cleaned copy here instead of modifying FILE
    #[arg(short, long, value_name = "COPY")]
    pub output: Option<PathBuf>,

    /// Keep ExifTool's FILE_original backup
    #[arg(long, conflicts_with = "output")]
    pub backup: bool,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum GpsCommand {
    /// Show GPS coordinates and a map link
    Show {
        /// File to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write GPS coordinates in decimal degrees
    #[command(allow_negative_numbers = true)]
    Set {
        /// File to modify
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Latitude, -90 to 90 (negative is south)
        #[arg(value_name = "LAT")]
        latitude: f64,

        /// Longitude, -180 to 180 (negative is west)
        #[arg(value_name = "LON")]
        longitude: f64,

        /// Altitude in metres (negative is below sea level)
        #[arg(long = "alt", value_name = "METRES")]
        altitude: Option<f64>,

        /// Keep ExifTool's FILE_original backup
        #[arg(long)]
        backup: bool,
    },
    /// Remove all GPS data
    Remove {
        /// File to modify
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep ExifTool's FILE_original backup
        #[arg(long)]
        backup: bool,
    },
}

#[derive(clap::Args)]
pub struct EditArgs {
    /// File to modify
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Tags to write; an empty value deletes the tag
    #[arg(value_name = "TAG=VALUE", required = true)]
    pub tags: Vec<String>,

    /// Keep ExifTool's FILE_original backup
    #[arg(long)]
    pub backup: bool,
}

#[derive(clap::Args)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["strip_all", "strip_gps", "set"]),
))]
pub struct BatchArgs {
    /// Folder to process recursively
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Remove all metadata
    #[arg(long)]
    pub strip_all: bool,

    /// Remove GPS data only
    #[arg(long)]
    pub strip_gps: bool,

    /// Write a tag to every file (repeatable)
    #[arg(long, value_name = "TAG=VALUE")]
    pub set: Vec<String>,

    /// Only touch these extensions (e.g. jpg,png)
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Keep ExifTool's *_original backups
    #[arg(long)]
    pub backup: bool,
}

#[derive(clap::Args)]
pub struct CopyTagsArgs {
    /// File to copy metadata from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// File to copy metadata onto
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Keep ExifTool's TARGET_original backup
    #[arg(long)]
    pub backup: bool,
}

/// Limits and concurrency shared by archive jobs.
#[derive(clap::Args)]
pub struct JobArgs {
    /// Number of files processed concurrently
    #[arg(short = 'J', long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Maximum number of entries in the archive
    #[arg(long, default_value = "10000")]
    pub max_files: usize,

    /// Maximum total extracted size in bytes (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single entry size in bytes (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Maximum compression ratio
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_compression_ratio: u32,
}

impl JobArgs {
    pub fn to_config(&self) -> JobConfig {
        let defaults = ExtractionLimits::default();
        let limits = ExtractionLimits {
            max_file_count: self.max_files,
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            max_total_size: self.max_total_size.unwrap_or(defaults.max_total_size),
            max_compression_ratio: f64::from(self.max_compression_ratio),
        };
        JobConfig::default()
            .with_limits(limits)
            .with_workers(usize::from(self.jobs))
    }
}

#[derive(clap::Args)]
pub struct CleanArgs {
    /// ZIP archive to clean (any extension; checked by content)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination archive (default: <ARCHIVE stem>_clean.zip next to it)
    #[arg(short, long, value_name = "DEST")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub job: JobArgs,

    /// Overwrite the destination without asking
    #[arg(short, long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// ZIP archive to inspect
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub job: JobArgs,
}

#[derive(clap::Args)]
pub struct SweepArgs {
    /// Remove workspaces older than this many hours
    #[arg(long, default_value = "24", value_name = "HOURS")]
    pub older_than: u64,

    /// Directory holding the workspaces (default: system temp directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
