//! Read command - decode a data file and print its records

use std::fmt::Display;
use std::fs::File;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::provider::quiver::{open_page_views, open_universe, DataFileReader, ReadErrorPolicy};

/// How records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// One human-readable line per record
    Summary,
}

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Reference date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Read a ticker's page-view history instead of the universe file
    #[arg(long, short)]
    pub ticker: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Stop at the first line that fails to decode
    #[arg(long)]
    pub abort_on_error: bool,
}

/// Execute the read command
pub fn execute(args: ReadArgs, settings: &Settings) -> Result<()> {
    let policy = if args.abort_on_error {
        ReadErrorPolicy::Abort
    } else {
        settings.reader.policy()
    };

    let config = super::subscription(settings, args.ticker.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let count = match args.ticker {
        Some(_) => write_records(open_page_views(&config, args.date, policy)?, args.format, &mut out)?,
        None => write_records(open_universe(&config, args.date, policy)?, args.format, &mut out)?,
    };

    info!("Read {} records for {}", count, args.date);
    Ok(())
}

/// Print every record from `reader`, returning how many were written
///
/// A line error that ends the reader is returned after the records before
/// it have been written.
pub fn write_records<T, W>(
    mut reader: DataFileReader<T, File>,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize>
where
    T: Serialize + Display + 'static,
    W: Write,
{
    let mut count = 0;
    for item in reader.by_ref() {
        let record = item?;
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
            OutputFormat::Summary => writeln!(out, "{}", record)?,
        }
        count += 1;
    }
    out.flush()?;

    if reader.skipped_count() > 0 {
        info!(
            skipped = reader.skipped_count(),
            lines = reader.line_number(),
            "Some lines were skipped"
        );
    }

    Ok(count)
}
