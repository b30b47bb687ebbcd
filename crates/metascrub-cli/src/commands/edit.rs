//! Edit command implementation.

use crate::cli::EditArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::api;
use metascrub_core::engine::MetadataEngine;

pub fn execute(
    args: &EditArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let tags = super::parse_assignments(&args.tags)?;
    let summary = add_path_context(
        api::write_tags(engine, &args.file, &tags, args.backup),
        &args.file,
    )?;
    formatter.format_engine_summary("Tags written", &args.file, &summary)
}
