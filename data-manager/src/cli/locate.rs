//! Locate command - print where a dataset's file lives

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use crate::config::Settings;
use crate::provider::quiver::{WikipediaPageViews, WikipediaUniverse};
use crate::provider::{AlternativeData, SubscriptionDataSource};

/// Arguments for the locate command
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Reference date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Locate as for live trading
    #[arg(long)]
    pub live: bool,

    /// Locate a ticker's page-view history instead of the universe file
    #[arg(long, short)]
    pub ticker: Option<String>,
}

/// Resolve the data source for the arguments
pub fn source(args: &LocateArgs, settings: &Settings) -> Result<SubscriptionDataSource> {
    let config = super::subscription(settings, args.ticker.as_deref())?;
    let source = match args.ticker {
        Some(_) => WikipediaPageViews::get_source(&config, args.date, args.live)?,
        None => WikipediaUniverse::get_source(&config, args.date, args.live)?,
    };
    Ok(source)
}

/// Execute the locate command
pub fn execute(args: LocateArgs, settings: &Settings) -> Result<()> {
    let source = source(&args, settings)?;
    println!("{}", source.path.display());
    Ok(())
}
