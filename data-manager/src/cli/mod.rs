//! Command-line interface
//!
//! Provides CLI commands for inspecting the Quiver Wikipedia data files.

pub mod locate;
pub mod read;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use trading_common::instruments::{EncodedIdentifierResolver, Market, SecurityIdentifier, Symbol};

use crate::config::Settings;
use crate::provider::SubscriptionConfig;

/// Data Manager CLI
#[derive(Parser)]
#[command(name = "data-manager")]
#[command(about = "Locate and read Quiver Wikipedia page-view data")]
#[command(version)]
pub struct Cli {
    /// Data folder to use instead of the configured one
    #[arg(long, global = true)]
    pub data_folder: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the path of the file holding the records for a date
    Locate(locate::LocateArgs),
    /// Read and print the records of a data file
    Read(read::ReadArgs),
}

/// First listing date assumed for tickers given on the command line
fn default_listing_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1998, 1, 2).unwrap_or_default()
}

/// Symbol for a ticker typed on the command line
///
/// Accepts either an encoded identifier (`"AAPL R735QTJ8XC9X"`) or a plain
/// ticker, which is treated as a US equity.
pub fn parse_ticker(ticker: &str) -> Result<Symbol> {
    let ticker = ticker.trim();
    if ticker.contains(' ') {
        let id = SecurityIdentifier::parse(ticker)?;
        let value = id.symbol().to_string();
        return Ok(Symbol::new(id, value));
    }

    let value = ticker.to_uppercase();
    let id = SecurityIdentifier::equity(value.clone(), Market::USA, default_listing_date())?;
    Ok(Symbol::new(id, value))
}

/// Subscription for the universe file, or for one ticker's history
pub fn subscription(settings: &Settings, ticker: Option<&str>) -> Result<SubscriptionConfig> {
    let root = settings.storage.data_folder.clone();
    match ticker {
        Some(ticker) => Ok(SubscriptionConfig::for_symbol(root, parse_ticker(ticker)?)),
        None => Ok(SubscriptionConfig::universe(
            root,
            Arc::new(EncodedIdentifierResolver),
        )),
    }
}
