//! Wikipedia page-view universe dataset
//!
//! One file per date under `alternative/quiver/wikipedia/universe/`, named
//! `YYYYMMDD.csv`, with one line per company:
//!
//! ```text
//! AAPL R735QTJ8XC9X,AAPL,1500000,12.5,-3.2
//! ```
//!
//! Fields: security identifier, ticker, page views, week-over-week percent
//! change, month-over-month percent change. Percent changes are whole-number
//! percentages (100.0 means +100%).

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use trading_common::instruments::{SecurityIdentifierResolver, Symbol};

use super::{
    display_optional, one_day, parse_decimal, split_fields, start_of_day, wikipedia_folder,
};
use crate::provider::traits::{
    AlternativeData, Field, ParseError, ProviderResult, SubscriptionConfig,
    SubscriptionDataSource,
};

/// Number of comma-separated fields per universe line
pub const UNIVERSE_FIELD_COUNT: usize = 5;

/// One company's page-view observation for a universe date
///
/// The record covers the day before its reference date and becomes
/// available at the reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikipediaUniverse {
    /// Company the observation is about
    pub symbol: Symbol,
    /// Reference date of the batch the record was read from
    pub date: NaiveDate,
    /// Page views, absent when not reported
    pub page_views: Option<Decimal>,
    /// Week-over-week change in page views, in percent
    pub week_percent_change: Option<Decimal>,
    /// Month-over-month change in page views, in percent
    pub month_percent_change: Option<Decimal>,
}

impl WikipediaUniverse {
    /// Length of time each record covers
    pub fn period(&self) -> Duration {
        one_day()
    }

    /// Start of the covered day: reference date minus one period
    pub fn time(&self) -> DateTime<Utc> {
        start_of_day(self.date) - self.period()
    }

    /// End of the covered day, which is the reference date itself
    pub fn end_time(&self) -> DateTime<Utc> {
        self.time() + self.period()
    }

    /// Generic value slot: the page view count
    pub fn value(&self) -> Decimal {
        self.page_views.unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for WikipediaUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} page views - {}% weekly change - {}% monthly change",
            self.symbol,
            display_optional(self.page_views),
            display_optional(self.week_percent_change),
            display_optional(self.month_percent_change),
        )
    }
}

/// Path of the universe file for `reference_date`
///
/// Live and historical reads share the same path.
pub fn locate(storage_root: &Path, reference_date: NaiveDate, _live_mode: bool) -> PathBuf {
    wikipedia_folder(storage_root)
        .join("universe")
        .join(format!("{}.csv", reference_date.format("%Y%m%d")))
}

/// Decode one universe line read from the file for `reference_date`
pub fn decode(
    line: &str,
    reference_date: NaiveDate,
    resolver: &dyn SecurityIdentifierResolver,
) -> Result<WikipediaUniverse, ParseError> {
    let fields = split_fields(line, UNIVERSE_FIELD_COUNT)?;

    let page_views = parse_decimal(fields[2], Field::PageViews)?;
    let week_percent_change = parse_decimal(fields[3], Field::WeekPercentChange)?;
    let month_percent_change = parse_decimal(fields[4], Field::MonthPercentChange)?;

    let id = resolver
        .resolve(fields[0])
        .map_err(|source| ParseError::IdentifierResolution {
            token: fields[0].to_string(),
            source,
        })?;
    debug!("Resolved '{}' to {}", fields[0], id);

    Ok(WikipediaUniverse {
        symbol: Symbol::new(id, fields[1]),
        date: reference_date,
        page_views: Some(page_views),
        week_percent_change: Some(week_percent_change),
        month_percent_change: Some(month_percent_change),
    })
}

impl AlternativeData for WikipediaUniverse {
    fn get_source(
        config: &SubscriptionConfig,
        date: NaiveDate,
        is_live: bool,
    ) -> ProviderResult<SubscriptionDataSource> {
        Ok(SubscriptionDataSource::local(locate(
            &config.storage_root,
            date,
            is_live,
        )))
    }

    fn reader(
        config: &SubscriptionConfig,
        line: &str,
        date: NaiveDate,
        _is_live: bool,
    ) -> ProviderResult<Self> {
        Ok(decode(line, date, config.resolver.as_ref())?)
    }

    fn requires_mapping() -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use trading_common::instruments::{
        EncodedIdentifierResolver, MappedIdentifierResolver, ResolverError, SecurityIdentifier,
    };

    use crate::provider::traits::{ProviderError, Resolution};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn aapl() -> SecurityIdentifier {
        SecurityIdentifier::parse("AAPL R735QTJ8XC9X").unwrap()
    }

    fn resolver() -> MappedIdentifierResolver {
        MappedIdentifierResolver::new().with_mapping("T", aapl())
    }

    #[test]
    fn test_decode_line() {
        let record = decode("T,AAPL,1500000,12.5,-3.2", date(2020, 3, 15), &resolver()).unwrap();

        assert_eq!(record.symbol.id, aapl());
        assert_eq!(record.symbol.value, "AAPL");
        assert_eq!(record.page_views, Some(dec!(1500000)));
        assert_eq!(record.week_percent_change, Some(dec!(12.5)));
        assert_eq!(record.month_percent_change, Some(dec!(-3.2)));
        assert_eq!(record.value(), dec!(1500000));
        assert_eq!(record.date, date(2020, 3, 15));
        assert_eq!(record.time(), start_of_day(date(2020, 3, 14)));
        assert_eq!(record.end_time(), start_of_day(date(2020, 3, 15)));
    }

    #[test]
    fn test_decode_encoded_identifier() {
        let line = "AAPL R735QTJ8XC9X,AAPL,0,0,0";
        let record = decode(line, date(2021, 1, 4), &EncodedIdentifierResolver).unwrap();

        assert_eq!(record.symbol.id, aapl());
        assert_eq!(record.value(), Decimal::ZERO);
    }

    #[test]
    fn test_period_invariants() {
        for (y, m, d) in [(2020, 3, 1), (2020, 1, 1), (2024, 2, 29), (1999, 12, 31)] {
            let record = decode("T,AAPL,10,1,1", date(y, m, d), &resolver()).unwrap();
            assert_eq!(record.period(), Duration::days(1));
            assert_eq!(record.end_time() - record.time(), record.period());
            assert_eq!(record.time(), start_of_day(date(y, m, d)) - Duration::days(1));
        }
    }

    #[test]
    fn test_decode_rejects_missing_percent_changes() {
        let reference = date(2020, 3, 15);

        let err = decode("T,AAPL,42,,", reference, &resolver()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NumericParse {
                field: Field::WeekPercentChange,
                ..
            }
        ));

        let err = decode("T,AAPL,42,1.5,", reference, &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::MonthPercentChange));
    }

    #[test]
    fn test_decode_rejects_digit_separators() {
        let err = decode("T,AAPL,1_000,1,1", date(2020, 3, 15), &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::PageViews));
    }

    #[test]
    fn test_decode_malformed_line() {
        let err = decode("T,AAPL,1500000,12.5", date(2020, 3, 15), &resolver()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedLine {
                expected: 5,
                found: 4,
                ..
            }
        ));

        let err = decode("T,AAPL,1,2,3,4", date(2020, 3, 15), &resolver()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { found: 6, .. }));

        assert!(matches!(
            decode("", date(2020, 3, 15), &resolver()),
            Err(ParseError::MalformedLine { found: 1, .. })
        ));
    }

    #[test]
    fn test_decode_numeric_errors_name_the_field() {
        let reference = date(2020, 3, 15);

        let err = decode("T,AAPL,many,12.5,-3.2", reference, &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::PageViews));
        assert!(err.to_string().contains("'many'"));

        let err = decode("T,AAPL,10,up,-3.2", reference, &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::WeekPercentChange));

        let err = decode("T,AAPL,10,12.5,down", reference, &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::MonthPercentChange));

        // Page views are always reported in this file
        let err = decode("T,AAPL,,12.5,-3.2", reference, &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::PageViews));
    }

    #[test]
    fn test_decode_unresolvable_identifier() {
        let err = decode("UNKNOWN,AAPL,1,2,3", date(2020, 3, 15), &resolver()).unwrap_err();
        match err {
            ParseError::IdentifierResolution { token, source } => {
                assert_eq!(token, "UNKNOWN");
                assert!(matches!(source, ResolverError::Unmapped(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = decode("T,AAPL,1,2,3", date(2020, 3, 15), &EncodedIdentifierResolver).unwrap_err();
        assert_eq!(err.field(), Some(Field::SecurityIdentifier));
    }

    #[test]
    fn test_locate() {
        assert_eq!(
            locate(Path::new("/data"), date(2020, 3, 15), false),
            PathBuf::from("/data/alternative/quiver/wikipedia/universe/20200315.csv")
        );
        assert_eq!(
            locate(Path::new("/data"), date(2020, 3, 15), true),
            locate(Path::new("/data"), date(2020, 3, 15), false)
        );

        let path = locate(Path::new("relative/root"), date(2001, 1, 9), false);
        assert!(path.ends_with("universe/20010109.csv"));
    }

    #[test]
    fn test_alternative_data_impl() {
        let config = SubscriptionConfig::universe("/data", Arc::new(resolver()));

        let source = WikipediaUniverse::get_source(&config, date(2020, 3, 15), true).unwrap();
        assert_eq!(
            source.path,
            PathBuf::from("/data/alternative/quiver/wikipedia/universe/20200315.csv")
        );

        let record =
            WikipediaUniverse::reader(&config, "T,AAPL,1500000,12.5,-3.2", date(2020, 3, 15), false)
                .unwrap();
        assert_eq!(record.value(), dec!(1500000));

        let err = WikipediaUniverse::reader(&config, "T,AAPL", date(2020, 3, 15), false).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Parse(ParseError::MalformedLine { .. })
        ));

        assert_eq!(WikipediaUniverse::default_resolution(), Resolution::Daily);
        assert_eq!(WikipediaUniverse::supported_resolutions(), &[Resolution::Daily]);
        assert_eq!(WikipediaUniverse::data_time_zone(), chrono_tz::Tz::UTC);
        assert!(WikipediaUniverse::is_sparse_data());
        assert!(!WikipediaUniverse::requires_mapping());
    }

    #[test]
    fn test_display() {
        let mut record = decode("T,AAPL,1500000,12.5,-3.2", date(2020, 3, 15), &resolver()).unwrap();
        assert_eq!(
            record.to_string(),
            "AAPL - 1500000 page views - 12.5% weekly change - -3.2% monthly change"
        );

        // Records built elsewhere may lack a value
        record.month_percent_change = None;
        assert_eq!(
            record.to_string(),
            "AAPL - 1500000 page views - 12.5% weekly change - % monthly change"
        );

        let err = decode("T,AAPL,1500000,12.5,", date(2020, 3, 15), &resolver()).unwrap_err();
        assert_eq!(err.field(), Some(Field::MonthPercentChange));
    }
}
