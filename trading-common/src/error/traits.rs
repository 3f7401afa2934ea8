//! Error classification traits.
//!
//! These traits allow errors to self-describe their characteristics so a
//! driver can decide whether to skip an input, retry, or stop.

use std::time::Duration;

use super::common::*;
use crate::instruments::{IdentifierError, ResolverError};

/// Classification of error types for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient errors that may resolve on retry (IO hiccups)
    Transient,
    /// Permanent errors that won't resolve on retry (malformed input)
    Permanent,
    /// Configuration errors (missing config, invalid settings)
    Configuration,
    /// Internal errors (bugs, unexpected state)
    Internal,
}

/// Trait for errors that can classify themselves.
pub trait ErrorClassification {
    /// Returns the category of this error
    fn category(&self) -> ErrorCategory;

    /// Returns true if this error is transient and may succeed on retry
    fn is_transient(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transient)
    }

    /// Returns true if this error is permanent and won't succeed on retry
    fn is_permanent(&self) -> bool {
        matches!(self.category(), ErrorCategory::Permanent)
    }

    /// Suggests a delay before retrying, if applicable
    fn suggested_retry_delay(&self) -> Option<Duration> {
        match self.category() {
            ErrorCategory::Transient => Some(Duration::from_millis(100)),
            _ => None,
        }
    }

    /// Returns the maximum number of retries suggested for this error
    fn max_retries(&self) -> u32 {
        match self.category() {
            ErrorCategory::Transient => 3,
            _ => 0,
        }
    }
}

impl ErrorClassification for ConfigurationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl ErrorClassification for SerializationError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Permanent
    }
}

impl ErrorClassification for IdentifierError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Permanent
    }
}

impl ErrorClassification for ResolverError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Permanent
    }
}
