//! metascrub CLI - Command-line utility for stripping metadata from files
//! and ZIP archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;
mod prompt;

use anyhow::Result;
use clap::Parser;
use cli::Commands;
use progress::CliProgress;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let progress = CliProgress::should_show(cli.quiet, cli.json);

    if cli.command.sweeps_on_startup() {
        commands::sweep::startup();
    }

    let engine = || commands::engine(&cli);

    match &cli.command {
        Commands::View(args) => commands::view::execute(args, &engine()?, &*formatter),
        Commands::Strip(args) => {
            commands::strip::execute(args, &engine()?, &*formatter, cli.quiet)
        }
        Commands::Gps(command) => commands::gps::execute(command, &engine()?, &*formatter),
        Commands::Edit(args) => commands::edit::execute(args, &engine()?, &*formatter),
        Commands::Batch(args) => commands::batch::execute(args, &engine()?, &*formatter),
        Commands::CopyTags(args) => commands::copy_tags::execute(args, &engine()?, &*formatter),
        Commands::Clean(args) => {
            commands::clean::execute(args, &engine()?, &*formatter, cli.quiet, progress)
        }
        Commands::Inspect(args) => {
            commands::inspect::execute(args, &engine()?, &*formatter, progress)
        }
        Commands::Sweep(args) => commands::sweep::execute(args, &*formatter),
        Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
