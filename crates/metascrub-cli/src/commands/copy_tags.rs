//! Copy-tags command implementation.

use crate::cli::CopyTagsArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::api;
use metascrub_core::engine::MetadataEngine;

pub fn execute(
    args: &CopyTagsArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let summary = add_path_context(
        api::copy_tags(engine, &args.source, &args.target, args.backup),
        &args.target,
    )?;
    formatter.format_engine_summary("Tags copied", &args.target, &summary)
}
