//! Batch (folder) command implementation.

use super::parse_assignments;
use crate::cli::BatchArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use metascrub_core::api;
use metascrub_core::api::FolderAction;
use metascrub_core::engine::FieldScope;
use metascrub_core::engine::MetadataEngine;

fn action(args: &BatchArgs) -> Result<FolderAction> {
    Ok(if args.strip_all {
        FolderAction::Strip(FieldScope::All)
    } else if args.strip_gps {
        FolderAction::Strip(FieldScope::Gps)
    } else {
        FolderAction::Write(parse_assignments(&args.set)?)
    })
}

pub fn execute(
    args: &BatchArgs,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let action = action(args)?;
    let summary = add_path_context(
        api::process_folder(engine, &args.dir, &action, &args.ext, args.backup),
        &args.dir,
    )?;

    formatter.format_engine_summary("Folder processed", &args.dir, &summary)?;

    if summary.errors > 0 {
        if summary.updated + summary.unchanged == 0 {
            bail!("No file in '{}' could be processed", args.dir.display());
        }
        formatter.format_warning(&format!(
            "{} file(s) in '{}' could not be processed",
            summary.errors,
            args.dir.display()
        ));
    }
    Ok(())
}
