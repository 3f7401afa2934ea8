//! # Data Manager
//!
//! Adapters for Quiver Quantitative's Wikipedia page-view datasets.
//!
//! ## Datasets
//!
//! - **Universe**: one file per date listing every company's page views,
//!   see [`WikipediaUniverse`]
//! - **Per-company history**: one file per ticker, see [`WikipediaPageViews`]
//!
//! ## Architecture
//!
//! Each dataset implements [`AlternativeData`]: `get_source` locates the file
//! for a date and `reader` decodes one line. [`DataFileReader`] drives a
//! decoder over a file under a [`ReadErrorPolicy`]. Records can be stored with
//! the JSON or fixed-size binary codecs in [`schema`].

pub mod cli;
pub mod config;
pub mod provider;
pub mod schema;

// Re-export commonly used types
pub use config::Settings;
pub use provider::quiver::{
    open, open_page_views, open_universe, DataFileReader, ReadError, ReadErrorPolicy,
    WikipediaPageViews, WikipediaUniverse,
};
pub use provider::{
    AlternativeData, ParseError, ProviderError, ProviderResult, SubscriptionConfig,
    SubscriptionDataSource,
};
pub use schema::{CompactCodec, JsonCodec, RecordCodec};
