//! Encoded security identifiers.
//!
//! A security identifier is the platform's stable key for a tradable
//! instrument. It survives ticker renames, so data files reference it
//! instead of the display ticker.
//!
//! # Wire format
//!
//! ```text
//! AAPL R735QTJ8XC9X
//! ^^^^ ^^^^^^^^^^^^
//!  |        |
//!  |        +-- base-36 encoded property word (u64)
//!  +----------- symbol at listing time
//! ```
//!
//! Derivatives append their underlying after a `|`, e.g.
//! `SPY 2U|SPY R735QTJ8XC9X`.
//!
//! The property word packs decimal digit fields, least significant first:
//!
//! | Field         | Width     |
//! |---------------|-----------|
//! | security type | 100       |
//! | market        | 1,000     |
//! | strike scale  | 100       |
//! | strike        | 1,000,000 |
//! | option style  | 10        |
//! | date (days)   | 100,000   |
//! | option right  | 10        |
//!
//! Dates are stored as days since 1899-12-30.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const SECURITY_TYPE_WIDTH: u64 = 100;
const SECURITY_TYPE_OFFSET: u64 = 1;
const MARKET_WIDTH: u64 = 1_000;
const MARKET_OFFSET: u64 = SECURITY_TYPE_OFFSET * SECURITY_TYPE_WIDTH;
const STRIKE_SCALE_WIDTH: u64 = 100;
const STRIKE_SCALE_OFFSET: u64 = MARKET_OFFSET * MARKET_WIDTH;
const STRIKE_WIDTH: u64 = 1_000_000;
const STRIKE_OFFSET: u64 = STRIKE_SCALE_OFFSET * STRIKE_SCALE_WIDTH;
const OPTION_STYLE_WIDTH: u64 = 10;
const OPTION_STYLE_OFFSET: u64 = STRIKE_OFFSET * STRIKE_WIDTH;
const DAYS_WIDTH: u64 = 100_000;
const DAYS_OFFSET: u64 = OPTION_STYLE_OFFSET * OPTION_STYLE_WIDTH;
const PUT_CALL_WIDTH: u64 = 10;
const PUT_CALL_OFFSET: u64 = DAYS_OFFSET * DAYS_WIDTH;

/// 1899-12-30 expressed as days from the common era (0001-01-01 = day 1)
const DATE_EPOCH_DAYS_FROM_CE: i32 = 693_594;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Errors raised while parsing an encoded identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier '{0}' is missing the encoded properties")]
    MissingProperties(String),

    #[error("Identifier '{0}' has an empty symbol")]
    MissingSymbol(String),

    #[error("Invalid base-36 character '{character}' in '{value}'")]
    InvalidCharacter { value: String, character: char },

    #[error("Encoded properties '{0}' overflow 64 bits")]
    Overflow(String),

    #[error("Unknown security type code {0}")]
    UnknownSecurityType(u64),

    #[error("Date {0} is outside the encodable range")]
    DateOutOfRange(NaiveDate),
}

/// Security type stored in the two least significant digits of the properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    Base,
    Equity,
    Option,
    Commodity,
    Forex,
    Future,
    Cfd,
    Crypto,
    FutureOption,
    Index,
    IndexOption,
    CryptoFuture,
}

impl SecurityType {
    /// Numeric code used in the encoded properties
    pub fn code(&self) -> u64 {
        match self {
            SecurityType::Base => 0,
            SecurityType::Equity => 1,
            SecurityType::Option => 2,
            SecurityType::Commodity => 3,
            SecurityType::Forex => 4,
            SecurityType::Future => 5,
            SecurityType::Cfd => 6,
            SecurityType::Crypto => 7,
            SecurityType::FutureOption => 8,
            SecurityType::Index => 9,
            SecurityType::IndexOption => 10,
            SecurityType::CryptoFuture => 11,
        }
    }

    /// Look up a security type by its numeric code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(SecurityType::Base),
            1 => Some(SecurityType::Equity),
            2 => Some(SecurityType::Option),
            3 => Some(SecurityType::Commodity),
            4 => Some(SecurityType::Forex),
            5 => Some(SecurityType::Future),
            6 => Some(SecurityType::Cfd),
            7 => Some(SecurityType::Crypto),
            8 => Some(SecurityType::FutureOption),
            9 => Some(SecurityType::Index),
            10 => Some(SecurityType::IndexOption),
            11 => Some(SecurityType::CryptoFuture),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Market code table
pub struct Market;

impl Market {
    pub const USA: u16 = 1;

    const MARKETS: &'static [(&'static str, u16)] = &[
        ("empty", 0),
        ("usa", 1),
        ("fxcm", 2),
        ("oanda", 3),
        ("dukascopy", 4),
        ("bitfinex", 5),
        ("globex", 6),
        ("nymex", 7),
        ("cbot", 8),
        ("ice", 9),
        ("cbe", 10),
        ("cboe", 11),
        ("india", 12),
        ("gdax", 13),
        ("kraken", 14),
        ("bittrex", 15),
        ("bithumb", 16),
        ("binance", 17),
        ("poloniex", 18),
        ("coinone", 19),
        ("hitbtc", 20),
        ("okex", 21),
        ("bitstamp", 22),
        ("ose", 23),
        ("sgx", 24),
        ("hkfe", 25),
    ];

    /// Market name for a numeric code
    pub fn name(code: u16) -> Option<&'static str> {
        Self::MARKETS
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| *name)
    }

    /// Numeric code for a market name (case-insensitive)
    pub fn code(name: &str) -> Option<u16> {
        let name = name.to_lowercase();
        Self::MARKETS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| *code)
    }
}

/// Encoded security identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityIdentifier {
    symbol: String,
    properties: u64,
    underlying: Option<Box<SecurityIdentifier>>,
}

impl SecurityIdentifier {
    /// Build an identifier from a symbol and a raw property word
    pub fn new(symbol: impl Into<String>, properties: u64) -> Self {
        Self {
            symbol: symbol.into(),
            properties,
            underlying: None,
        }
    }

    /// Build an equity identifier listed on `market` since `first_date`
    pub fn equity(
        symbol: impl Into<String>,
        market: u16,
        first_date: NaiveDate,
    ) -> Result<Self, IdentifierError> {
        let days = first_date.num_days_from_ce() - DATE_EPOCH_DAYS_FROM_CE;
        if days < 0 || days as u64 >= DAYS_WIDTH {
            return Err(IdentifierError::DateOutOfRange(first_date));
        }

        let properties = SecurityType::Equity.code() * SECURITY_TYPE_OFFSET
            + (market as u64 % MARKET_WIDTH) * MARKET_OFFSET
            + days as u64 * DAYS_OFFSET;

        Ok(Self::new(symbol, properties))
    }

    /// Attach an underlying identifier
    pub fn with_underlying(mut self, underlying: SecurityIdentifier) -> Self {
        self.underlying = Some(Box::new(underlying));
        self
    }

    /// Parse the encoded form (`"SYMBOL PROPS[|UNDERLYING...]"`)
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }

        // The chain is written outermost first; build it from the innermost underlying
        let parts: Vec<&str> = value.split('|').collect();
        let mut identifier: Option<SecurityIdentifier> = None;
        for part in parts.iter().rev() {
            let mut parsed = Self::parse_single(part)?;
            parsed.underlying = identifier.map(Box::new);
            identifier = Some(parsed);
        }

        identifier.ok_or(IdentifierError::Empty)
    }

    fn parse_single(part: &str) -> Result<Self, IdentifierError> {
        let (symbol, encoded) = part
            .split_once(' ')
            .ok_or_else(|| IdentifierError::MissingProperties(part.to_string()))?;

        if symbol.is_empty() {
            return Err(IdentifierError::MissingSymbol(part.to_string()));
        }
        if encoded.is_empty() {
            return Err(IdentifierError::MissingProperties(part.to_string()));
        }

        let properties = decode_base36(encoded)?;
        let type_code = (properties / SECURITY_TYPE_OFFSET) % SECURITY_TYPE_WIDTH;
        if SecurityType::from_code(type_code).is_none() {
            return Err(IdentifierError::UnknownSecurityType(type_code));
        }

        Ok(Self::new(symbol, properties))
    }

    /// Symbol at listing time
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Raw property word
    pub fn properties(&self) -> u64 {
        self.properties
    }

    /// Underlying identifier for derivatives
    pub fn underlying(&self) -> Option<&SecurityIdentifier> {
        self.underlying.as_deref()
    }

    pub fn has_underlying(&self) -> bool {
        self.underlying.is_some()
    }

    pub fn security_type(&self) -> SecurityType {
        // Validated on construction through parse; raw words fall back to Base
        SecurityType::from_code(self.extract(SECURITY_TYPE_OFFSET, SECURITY_TYPE_WIDTH))
            .unwrap_or(SecurityType::Base)
    }

    /// Numeric market code
    pub fn market_code(&self) -> u16 {
        self.extract(MARKET_OFFSET, MARKET_WIDTH) as u16
    }

    /// Market name, or the numeric code when the market is not in the table
    pub fn market(&self) -> String {
        let code = self.market_code();
        Market::name(code)
            .map(|name| name.to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Listing date for equities, expiry for derivatives
    pub fn date(&self) -> Option<NaiveDate> {
        let days = self.extract(DAYS_OFFSET, DAYS_WIDTH) as i32;
        NaiveDate::from_num_days_from_ce_opt(DATE_EPOCH_DAYS_FROM_CE + days)
    }

    /// Option right digit (0 = call, 1 = put)
    pub fn option_right(&self) -> u8 {
        self.extract(PUT_CALL_OFFSET, PUT_CALL_WIDTH) as u8
    }

    /// Option style digit (0 = american, 1 = european)
    pub fn option_style(&self) -> u8 {
        self.extract(OPTION_STYLE_OFFSET, OPTION_STYLE_WIDTH) as u8
    }

    /// Strike price digits and their decimal scale
    pub fn strike_parts(&self) -> (u64, u64) {
        (
            self.extract(STRIKE_OFFSET, STRIKE_WIDTH),
            self.extract(STRIKE_SCALE_OFFSET, STRIKE_SCALE_WIDTH),
        )
    }

    fn extract(&self, offset: u64, width: u64) -> u64 {
        (self.properties / offset) % width
    }
}

impl fmt::Display for SecurityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, encode_base36(self.properties))?;
        if let Some(ref underlying) = self.underlying {
            write!(f, "|{}", underlying)?;
        }
        Ok(())
    }
}

impl FromStr for SecurityIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SecurityIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SecurityIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Encode a property word as upper-case base 36
pub fn encode_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Digits are drawn from the ASCII table above
    String::from_utf8_lossy(&digits).into_owned()
}

/// Decode an upper-case base-36 string into a property word
pub fn decode_base36(value: &str) -> Result<u64, IdentifierError> {
    let mut result: u64 = 0;
    for c in value.chars() {
        let digit = c
            .to_digit(36)
            .filter(|_| !c.is_ascii_lowercase())
            .ok_or_else(|| IdentifierError::InvalidCharacter {
                value: value.to_string(),
                character: c,
            })?;

        result = result
            .checked_mul(36)
            .and_then(|r| r.checked_add(digit as u64))
            .ok_or_else(|| IdentifierError::Overflow(value.to_string()))?;
    }
    Ok(result)
}
