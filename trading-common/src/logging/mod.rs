//! Standardized logging for the data adapters and their command-line tools.
//!
//! Logs are written to stderr so that record output on stdout stays
//! machine-readable.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Standard tracing filter (e.g., `info`, `data_manager=debug`)
//! - `LOG_FORMAT`: Output format - `pretty` (default), `compact`, or `json`
//! - `LOG_TIMESTAMPS`: Timestamp format - `local` (default), `utc`, or `none`
//!
//! # Usage
//!
//! ```rust,ignore
//! use trading_common::logging::{init_logging, LogConfig};
//!
//! init_logging(LogConfig::from_env().with_app_name("data-manager"))?;
//! ```

mod config;
mod json_layer;

pub use config::{init_logging, LogConfig, LogFormat, TimestampFormat};
pub use json_layer::JsonLogEvent;
