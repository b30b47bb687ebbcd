//! Strip command implementation.

use crate::cli::StripArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use crate::prompt::confirm_overwrite;
use anyhow::Result;
use metascrub_core::api;
use metascrub_core::api::StripOptions;
use metascrub_core::engine::MetadataEngine;

pub fn execute(
    args: &StripArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
    quiet: bool,
) -> Result<()> {
    let scope = args.scope.to_scope()?;
    let overwrite = args
        .output
        .as_deref()
        .is_some_and(|output| confirm_overwrite(output, args.force, quiet));

    let options = StripOptions {
        output: args.output.clone(),
        backup: args.backup,
        overwrite,
    };
    let status = add_path_context(
        api::strip_file(engine, &args.file, &scope, &options),
        &args.file,
    )?;

    formatter.format_strip_result(&args.file, &scope, status, args.output.as_deref())
}
