//! View command implementation.

use crate::cli::ViewArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::api;
use metascrub_core::engine::MetadataEngine;

pub fn execute(
    args: &ViewArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let tags = add_path_context(api::read_metadata(engine, &args.file), &args.file)?;
    formatter.format_metadata(&args.file, &tags)
}
