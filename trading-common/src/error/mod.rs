//! Error handling shared across the data adapters.
//!
//! This module provides:
//! - Common error types for configuration and serialization failures
//! - Error classification so callers can tell a bad input line from a
//!   flaky filesystem
//!
//! # Usage
//!
//! ```rust,ignore
//! use trading_common::error::{ErrorCategory, ErrorClassification};
//!
//! fn should_skip(err: &impl ErrorClassification) -> bool {
//!     err.category() == ErrorCategory::Permanent
//! }
//! ```

mod common;
mod traits;

pub use common::*;
pub use traits::*;
