//! Quiver Quantitative Wikipedia page-view datasets
//!
//! Two flat-file datasets live under `alternative/quiver/wikipedia/`:
//!
//! - `universe/YYYYMMDD.csv`: one file per date, one line per company
//!   (`sid,ticker,pageViews,weekPercentChange,monthPercentChange`)
//! - `{ticker}.csv`: one file per company, one line per date
//!   (`YYYYMMDD,pageViews,weekPercentChange,monthPercentChange`)
//!
//! Neither file has a header row.

pub mod reader;
pub mod wikipedia;
pub mod wikipedia_universe;

pub use reader::{open, open_page_views, open_universe, DataFileReader, ReadError, ReadErrorPolicy};
pub use wikipedia::WikipediaPageViews;
pub use wikipedia_universe::WikipediaUniverse;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use super::traits::{Field, ParseError};

/// Every record covers exactly one day
pub(crate) fn one_day() -> Duration {
    Duration::days(1)
}

/// `{root}/alternative/quiver/wikipedia`
pub(crate) fn wikipedia_folder(storage_root: &Path) -> PathBuf {
    storage_root
        .join("alternative")
        .join("quiver")
        .join("wikipedia")
}

/// Midnight UTC at the start of `date`
pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Split a line on commas, requiring exactly `expected` fields
pub(crate) fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();

    if fields.len() != expected {
        return Err(ParseError::MalformedLine {
            expected,
            found: fields.len(),
            line: line.to_string(),
        });
    }
    Ok(fields)
}

/// Parse a decimal token; plain notation first, scientific as a fallback
pub(crate) fn parse_decimal(token: &str, field: Field) -> Result<Decimal, ParseError> {
    // Digit-group separators are not decimal notation
    if token.contains('_') {
        return Err(ParseError::NumericParse {
            field,
            token: token.to_string(),
            reason: "digit separators are not allowed".to_string(),
        });
    }

    if let Ok(d) = Decimal::from_str(token) {
        return Ok(d);
    }

    Decimal::from_scientific(token).map_err(|e| ParseError::NumericParse {
        field,
        token: token.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a decimal token where an empty token means "not reported"
pub(crate) fn parse_optional_decimal(
    token: &str,
    field: Field,
) -> Result<Option<Decimal>, ParseError> {
    if token.is_empty() {
        return Ok(None);
    }
    parse_decimal(token, field).map(Some)
}

/// Render an optional value, absent values as an empty string
pub(crate) fn display_optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a, b ,c", 3).unwrap(), vec!["a", "b", "c"]);
        assert!(matches!(
            split_fields("a,b", 3),
            Err(ParseError::MalformedLine {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1500000", Field::PageViews).unwrap(), dec!(1500000));
        assert_eq!(parse_decimal("-3.2", Field::MonthPercentChange).unwrap(), dec!(-3.2));
        assert_eq!(parse_decimal("0", Field::PageViews).unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("1.5e2", Field::PageViews).unwrap(), dec!(150));

        let err = parse_decimal("12,5", Field::WeekPercentChange).unwrap_err();
        assert_eq!(err.field(), Some(Field::WeekPercentChange));
        assert!(parse_decimal("", Field::PageViews).is_err());

        let err = parse_decimal("1_000", Field::PageViews).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NumericParse { field: Field::PageViews, ref token, .. } if token == "1_000"
        ));
        assert!(parse_decimal("1_0e2", Field::PageViews).is_err());
    }

    #[test]
    fn test_parse_optional_decimal() {
        assert_eq!(parse_optional_decimal("", Field::WeekPercentChange).unwrap(), None);
        assert_eq!(
            parse_optional_decimal("100.0", Field::WeekPercentChange).unwrap(),
            Some(dec!(100.0))
        );
        assert!(parse_optional_decimal("n/a", Field::WeekPercentChange).is_err());
    }

    #[test]
    fn test_wikipedia_folder() {
        assert_eq!(
            wikipedia_folder(Path::new("/data")),
            PathBuf::from("/data/alternative/quiver/wikipedia")
        );
    }
}
