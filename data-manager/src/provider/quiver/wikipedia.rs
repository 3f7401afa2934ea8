//! Per-company Wikipedia page-view history
//!
//! One file per company at `alternative/quiver/wikipedia/{ticker}.csv`
//! (lower-case ticker), one line per day:
//!
//! ```text
//! 20200314,1500000,12.5,-3.2
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trading_common::instruments::Symbol;

use super::{
    display_optional, one_day, parse_optional_decimal, split_fields, start_of_day,
    wikipedia_folder,
};
use crate::provider::traits::{
    AlternativeData, Field, ParseError, ProviderError, ProviderResult, SubscriptionConfig,
    SubscriptionDataSource,
};

/// Number of comma-separated fields per history line
pub const HISTORY_FIELD_COUNT: usize = 4;

const DATASET: &str = "quiver-wikipedia";

/// One day of page views for a single company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikipediaPageViews {
    pub symbol: Symbol,
    /// Day the page views were counted on
    pub date: NaiveDate,
    pub page_views: Option<Decimal>,
    pub week_percent_change: Option<Decimal>,
    pub month_percent_change: Option<Decimal>,
}

impl WikipediaPageViews {
    pub fn period(&self) -> Duration {
        one_day()
    }

    /// Start of the counted day
    pub fn time(&self) -> DateTime<Utc> {
        start_of_day(self.date)
    }

    /// End of the counted day, when the observation becomes available
    pub fn end_time(&self) -> DateTime<Utc> {
        self.time() + self.period()
    }

    pub fn value(&self) -> Decimal {
        self.page_views.unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for WikipediaPageViews {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {} page views - {}% weekly change - {}% monthly change",
            self.symbol,
            self.date.format("%Y-%m-%d"),
            display_optional(self.page_views),
            display_optional(self.week_percent_change),
            display_optional(self.month_percent_change),
        )
    }
}

/// Path of the history file for `ticker`
pub fn locate(storage_root: &Path, ticker: &str) -> PathBuf {
    wikipedia_folder(storage_root).join(format!("{}.csv", ticker.to_lowercase()))
}

/// Decode one history line for `symbol`
pub fn decode(line: &str, symbol: &Symbol) -> Result<WikipediaPageViews, ParseError> {
    let fields = split_fields(line, HISTORY_FIELD_COUNT)?;

    let date = NaiveDate::parse_from_str(fields[0], "%Y%m%d").map_err(|e| {
        ParseError::InvalidDate {
            token: fields[0].to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(WikipediaPageViews {
        symbol: symbol.clone(),
        date,
        page_views: parse_optional_decimal(fields[1], Field::PageViews)?,
        week_percent_change: parse_optional_decimal(fields[2], Field::WeekPercentChange)?,
        month_percent_change: parse_optional_decimal(fields[3], Field::MonthPercentChange)?,
    })
}

impl AlternativeData for WikipediaPageViews {
    fn get_source(
        config: &SubscriptionConfig,
        _date: NaiveDate,
        _is_live: bool,
    ) -> ProviderResult<SubscriptionDataSource> {
        let symbol = config
            .symbol
            .as_ref()
            .ok_or(ProviderError::MissingSymbol { dataset: DATASET })?;

        Ok(SubscriptionDataSource::local(locate(
            &config.storage_root,
            &symbol.value,
        )))
    }

    fn reader(
        config: &SubscriptionConfig,
        line: &str,
        _date: NaiveDate,
        _is_live: bool,
    ) -> ProviderResult<Self> {
        let symbol = config
            .symbol
            .as_ref()
            .ok_or(ProviderError::MissingSymbol { dataset: DATASET })?;

        Ok(decode(line, symbol)?)
    }

    fn requires_mapping() -> bool {
        true
    }
}
