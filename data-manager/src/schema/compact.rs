//! Compact binary layout for universe records
//!
//! Fixed-size structure so batches can be written back-to-back and read
//! without a framing layer. Total size: 104 bytes.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use trading_common::error::SerializationError;
use trading_common::instruments::{encode_base36, SecurityIdentifier, Symbol};

use super::codec::RecordCodec;
use crate::provider::quiver::WikipediaUniverse;

/// 1970-01-01 expressed as days from the common era
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const TEXT_LEN: usize = 32;

const FLAG_PAGE_VIEWS: u8 = 0x01;
const FLAG_WEEK_CHANGE: u8 = 0x02;
const FLAG_MONTH_CHANGE: u8 = 0x04;

/// Binary representation of a [`WikipediaUniverse`] record
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CompactWikipediaUniverse {
    /// Security identifier property word (8 bytes)
    pub sid_properties: u64,
    /// Page views as fixed-point integer (value * 10^8) (8 bytes)
    pub page_views_fixed: i64,
    /// Week percent change as fixed-point integer (8 bytes)
    pub week_change_fixed: i64,
    /// Month percent change as fixed-point integer (8 bytes)
    pub month_change_fixed: i64,
    /// Reference date as days since 1970-01-01 (4 bytes)
    pub date_days: i32,
    /// Presence flags (1 byte): bit 0 page views, bit 1 week, bit 2 month
    pub flags: u8,
    /// Reserved for alignment (3 bytes)
    _reserved: [u8; 3],
    /// Security identifier symbol (32 bytes, null-terminated)
    pub sid_symbol: [u8; TEXT_LEN],
    /// Display ticker (32 bytes, null-terminated)
    pub ticker: [u8; TEXT_LEN],
}

// SAFETY: CompactWikipediaUniverse is repr(C), all fields are Pod-compatible, and there is no padding
unsafe impl bytemuck::Zeroable for CompactWikipediaUniverse {}
unsafe impl bytemuck::Pod for CompactWikipediaUniverse {}

impl CompactWikipediaUniverse {
    /// Scale factor for fixed-point conversion (10^8)
    pub const SCALE: i64 = 100_000_000;

    /// Encoded size in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Build the compact form of a record
    ///
    /// Fails instead of truncating when a value does not fit the layout.
    pub fn from_record(record: &WikipediaUniverse) -> Result<Self, SerializationError> {
        let id = &record.symbol.id;
        if id.has_underlying() {
            return Err(SerializationError::OutOfRange {
                field: "symbol.id",
                value: id.to_string(),
            });
        }

        let mut flags = 0u8;
        let page_views_fixed = to_fixed(record.page_views, "pageViews", FLAG_PAGE_VIEWS, &mut flags)?;
        let week_change_fixed = to_fixed(
            record.week_percent_change,
            "weekPercentChange",
            FLAG_WEEK_CHANGE,
            &mut flags,
        )?;
        let month_change_fixed = to_fixed(
            record.month_percent_change,
            "monthPercentChange",
            FLAG_MONTH_CHANGE,
            &mut flags,
        )?;

        Ok(Self {
            sid_properties: id.properties(),
            page_views_fixed,
            week_change_fixed,
            month_change_fixed,
            date_days: record.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE,
            flags,
            _reserved: [0; 3],
            sid_symbol: write_text(id.symbol(), "symbol.id")?,
            ticker: write_text(&record.symbol.value, "symbol.value")?,
        })
    }

    /// Convert back to a record
    pub fn to_record(&self) -> Result<WikipediaUniverse, SerializationError> {
        let sid_symbol = read_text(&self.sid_symbol)?;
        // Round-trip through the encoded form so the security type is validated
        let id = SecurityIdentifier::parse(&format!(
            "{} {}",
            sid_symbol,
            encode_base36(self.sid_properties)
        ))
        .map_err(|e| SerializationError::Binary(e.to_string()))?;

        let date = UNIX_EPOCH_DAYS_FROM_CE
            .checked_add(self.date_days)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| SerializationError::OutOfRange {
                field: "date",
                value: self.date_days.to_string(),
            })?;

        Ok(WikipediaUniverse {
            symbol: Symbol::new(id, read_text(&self.ticker)?),
            date,
            page_views: from_fixed(self.page_views_fixed, self.flags & FLAG_PAGE_VIEWS != 0),
            week_percent_change: from_fixed(
                self.week_change_fixed,
                self.flags & FLAG_WEEK_CHANGE != 0,
            ),
            month_percent_change: from_fixed(
                self.month_change_fixed,
                self.flags & FLAG_MONTH_CHANGE != 0,
            ),
        })
    }
}

fn to_fixed(
    value: Option<Decimal>,
    field: &'static str,
    flag: u8,
    flags: &mut u8,
) -> Result<i64, SerializationError> {
    let Some(value) = value else {
        return Ok(0);
    };

    let out_of_range = || SerializationError::OutOfRange {
        field,
        value: value.to_string(),
    };

    let scaled = value
        .checked_mul(Decimal::from(CompactWikipediaUniverse::SCALE))
        .ok_or_else(out_of_range)?;
    if !scaled.fract().is_zero() {
        return Err(SerializationError::Decimal(format!(
            "{} has more than 8 decimal places: {}",
            field, value
        )));
    }

    let fixed = scaled.to_i64().ok_or_else(out_of_range)?;
    *flags |= flag;
    Ok(fixed)
}

fn from_fixed(value: i64, present: bool) -> Option<Decimal> {
    present.then(|| Decimal::new(value, 8).normalize())
}

fn write_text(value: &str, field: &'static str) -> Result<[u8; TEXT_LEN], SerializationError> {
    let bytes = value.as_bytes();
    // Keep the last byte as the terminator
    if bytes.len() >= TEXT_LEN || bytes.contains(&0) {
        return Err(SerializationError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }

    let mut buffer = [0u8; TEXT_LEN];
    buffer[..bytes.len()].copy_from_slice(bytes);
    Ok(buffer)
}

fn read_text(buffer: &[u8; TEXT_LEN]) -> Result<String, SerializationError> {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(TEXT_LEN);
    std::str::from_utf8(&buffer[..end])
        .map(str::to_string)
        .map_err(|e| SerializationError::Binary(e.to_string()))
}

/// Fixed-size binary codec for universe records
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactCodec;

impl RecordCodec<WikipediaUniverse> for CompactCodec {
    fn encode(&self, record: &WikipediaUniverse) -> Result<Vec<u8>, SerializationError> {
        let compact = CompactWikipediaUniverse::from_record(record)?;
        Ok(bytemuck::bytes_of(&compact).to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<WikipediaUniverse, SerializationError> {
        let compact: CompactWikipediaUniverse = bytemuck::try_pod_read_unaligned(bytes)
            .map_err(|e| {
                SerializationError::Binary(format!(
                    "expected {} bytes, got {}: {:?}",
                    CompactWikipediaUniverse::SIZE,
                    bytes.len(),
                    e
                ))
            })?;
        compact.to_record()
    }
}
