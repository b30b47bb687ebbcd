//! GPS command implementations.

use crate::cli::GpsCommand;
use crate::error::add_path_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use metascrub_core::api;
use metascrub_core::api::StripOptions;
use metascrub_core::engine::FieldScope;
use metascrub_core::engine::MetadataEngine;
use metascrub_core::types::GpsCoordinates;

pub fn execute(
    command: &GpsCommand,
    engine: &dyn MetadataEngine,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    match command {
        GpsCommand::Show { file } => {
            let gps = add_path_context(api::read_gps(engine, file), file)?;
            formatter.format_gps(file, &gps)
        }
        GpsCommand::Set {
            file,
            latitude,
            longitude,
            altitude,
            backup,
        } => {
            let coordinates = add_path_context(
                GpsCoordinates::new(*latitude, *longitude, *altitude),
                file,
            )?;
            let summary = add_path_context(
                api::write_gps(engine, file, &coordinates, *backup),
                file,
            )?;
            formatter.format_engine_summary("GPS written", file, &summary)
        }
        GpsCommand::Remove { file, backup } => {
            let options = StripOptions {
                backup: *backup,
                ..StripOptions::default()
            };
            let status = add_path_context(
                api::strip_file(engine, file, &FieldScope::Gps, &options),
                file,
            )?;
            formatter.format_strip_result(file, &FieldScope::Gps, status, None)
        }
    }
}
