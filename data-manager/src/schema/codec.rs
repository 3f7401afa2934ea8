//! Codec abstraction and the JSON implementation.

use serde::de::DeserializeOwned;
use serde::Serialize;

use trading_common::error::SerializationError;

/// Converts records to and from bytes
pub trait RecordCodec<T> {
    fn encode(&self, record: &T) -> Result<Vec<u8>, SerializationError>;

    fn decode(&self, bytes: &[u8]) -> Result<T, SerializationError>;
}

/// JSON codec for any serde record
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> RecordCodec<T> for JsonCodec {
    fn encode(&self, record: &T) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(record)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, SerializationError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::quiver::WikipediaUniverse;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use trading_common::instruments::{SecurityIdentifier, Symbol};

    fn record() -> WikipediaUniverse {
        WikipediaUniverse {
            symbol: Symbol::new(SecurityIdentifier::parse("AAPL R735QTJ8XC9X").unwrap(), "AAPL"),
            date: NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
            page_views: Some(dec!(1500000)),
            week_percent_change: Some(dec!(12.5)),
            month_percent_change: None,
        }
    }

    #[test]
    fn test_json_field_names() {
        let bytes = JsonCodec.encode(&record()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["symbol"]["id"], "AAPL R735QTJ8XC9X");
        assert_eq!(json["symbol"]["value"], "AAPL");
        assert_eq!(json["date"], "2020-03-15");
        assert_eq!(json["pageViews"], "1500000");
        assert_eq!(json["weekPercentChange"], "12.5");
        assert!(json["monthPercentChange"].is_null());
    }

    #[test]
    fn test_json_decode() {
        let codec = JsonCodec;
        let bytes = codec.encode(&record()).unwrap();
        let decoded: WikipediaUniverse = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, record());
    }

    #[test]
    fn test_json_decode_rejects_bad_identifier() {
        let json = br#"{"symbol":{"id":"T","value":"AAPL"},"date":"2020-03-15","pageViews":"1","weekPercentChange":null,"monthPercentChange":null}"#;
        let result: Result<WikipediaUniverse, _> = JsonCodec.decode(json);
        assert!(matches!(result, Err(SerializationError::Json(_))));
    }
}
