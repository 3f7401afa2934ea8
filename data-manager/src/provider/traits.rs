//! Alternative data adapter trait definitions
//!
//! Each dataset implements [`AlternativeData`]: where its file for a date
//! lives, and how one line of that file becomes a record. Scheduling and
//! file transport are the caller's concern.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;

use trading_common::error::{ErrorCategory, ErrorClassification};
use trading_common::instruments::{
    EncodedIdentifierResolver, ResolverError, SecurityIdentifierResolver, Symbol,
};

/// Positional field of a data line, used to report which token failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SecurityIdentifier,
    Date,
    PageViews,
    WeekPercentChange,
    MonthPercentChange,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::SecurityIdentifier => "security identifier",
            Field::Date => "date",
            Field::PageViews => "page views",
            Field::WeekPercentChange => "week percent change",
            Field::MonthPercentChange => "month percent change",
        };
        f.write_str(name)
    }
}

/// Errors decoding a single data line
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Malformed line: expected {expected} fields, got {found}: '{line}'")]
    MalformedLine {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("Failed to parse {field} '{token}': {reason}")]
    NumericParse {
        field: Field,
        token: String,
        reason: String,
    },

    #[error("Failed to parse date '{token}': {reason}")]
    InvalidDate { token: String, reason: String },

    #[error("Failed to resolve security identifier '{token}': {source}")]
    IdentifierResolution {
        token: String,
        #[source]
        source: ResolverError,
    },
}

impl ParseError {
    /// The field that failed, when the failure is tied to one token
    pub fn field(&self) -> Option<Field> {
        match self {
            ParseError::MalformedLine { .. } => None,
            ParseError::NumericParse { field, .. } => Some(*field),
            ParseError::InvalidDate { .. } => Some(Field::Date),
            ParseError::IdentifierResolution { .. } => Some(Field::SecurityIdentifier),
        }
    }
}

impl ErrorClassification for ParseError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Permanent
    }
}

/// Adapter-level errors
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum ProviderError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Dataset '{dataset}' requires a subscribed symbol")]
    MissingSymbol { dataset: &'static str },
}

impl ErrorClassification for ProviderError {
    fn category(&self) -> ErrorCategory {
        match self {
            ProviderError::Parse(_) => ErrorCategory::Permanent,
            ProviderError::MissingSymbol { .. } => ErrorCategory::Configuration,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Data resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Tick,
    Second,
    Minute,
    Hour,
    Daily,
}

/// How the file at a located path is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportMedium {
    /// Read directly from the local data folder
    LocalFile,
}

/// Layout of the file at a located path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FileFormat {
    /// Comma-separated lines without a header row
    Csv,
}

/// Located source for one batch of records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDataSource {
    /// Path of the backing file
    pub path: PathBuf,
    /// Transport used to fetch it
    pub transport: TransportMedium,
    /// Layout of its lines
    pub format: FileFormat,
}

impl SubscriptionDataSource {
    /// Source read from the local data folder
    pub fn local(path: PathBuf) -> Self {
        Self {
            path,
            transport: TransportMedium::LocalFile,
            format: FileFormat::Csv,
        }
    }
}

/// Everything an adapter needs besides the line and the date
#[derive(Clone)]
pub struct SubscriptionConfig {
    /// Root of the data folder; set once at startup
    pub storage_root: PathBuf,
    /// Subscribed symbol, for per-symbol datasets
    pub symbol: Option<Symbol>,
    /// Resolver for identifier tokens inside data files
    pub resolver: Arc<dyn SecurityIdentifierResolver>,
}

impl SubscriptionConfig {
    /// Config for a universe dataset, resolving identifiers with `resolver`
    pub fn universe(
        storage_root: impl Into<PathBuf>,
        resolver: Arc<dyn SecurityIdentifierResolver>,
    ) -> Self {
        Self {
            storage_root: storage_root.into(),
            symbol: None,
            resolver,
        }
    }

    /// Config for a per-symbol dataset
    pub fn for_symbol(storage_root: impl Into<PathBuf>, symbol: Symbol) -> Self {
        Self {
            storage_root: storage_root.into(),
            symbol: Some(symbol),
            resolver: Arc::new(EncodedIdentifierResolver),
        }
    }
}

impl fmt::Debug for SubscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionConfig")
            .field("storage_root", &self.storage_root)
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

/// A dataset backed by one delimited text file per date (or per symbol)
pub trait AlternativeData: Sized {
    /// Locate the file holding the records for `date`
    fn get_source(
        config: &SubscriptionConfig,
        date: NaiveDate,
        is_live: bool,
    ) -> ProviderResult<SubscriptionDataSource>;

    /// Decode one line of the located file
    fn reader(
        config: &SubscriptionConfig,
        line: &str,
        date: NaiveDate,
        is_live: bool,
    ) -> ProviderResult<Self>;

    fn default_resolution() -> Resolution {
        Resolution::Daily
    }

    fn supported_resolutions() -> &'static [Resolution] {
        &[Resolution::Daily]
    }

    /// Time zone the file's dates are expressed in
    fn data_time_zone() -> Tz {
        Tz::UTC
    }

    /// Whether gaps between records are expected
    fn is_sparse_data() -> bool {
        true
    }

    /// Whether the symbol must be mapped through ticker changes before reading
    fn requires_mapping() -> bool;
}
