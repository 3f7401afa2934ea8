//! Data Manager CLI
//!
//! Provides commands for:
//! - `locate`: Print the path of a dataset file
//! - `read`: Decode a dataset file and print its records

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use data_manager::cli::{locate, read, Cli, Commands};
use data_manager::config::Settings;
use trading_common::logging::{init_logging, LogConfig};

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging(
        LogConfig::from_env()
            .with_app_name("data-manager")
            .with_default_level("data_manager=info"),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(data_folder) = cli.data_folder {
        settings.storage.data_folder = data_folder;
    }
    settings.validate()?;
    debug!("Settings: {:?}", settings);

    match cli.command {
        Commands::Locate(args) => locate::execute(args, &settings)?,
        Commands::Read(args) => read::execute(args, &settings)?,
    }

    Ok(())
}
