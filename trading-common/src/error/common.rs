//! Common error types shared across crates.
//!
//! Crate-specific errors can wrap these using `#[from]`.

use thiserror::Error;

/// Configuration-related errors.
///
/// Use this for settings loading, parsing, and validation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Field has invalid value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Configuration sources could not be merged or deserialized
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ConfigurationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Serialization errors for record codecs.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SerializationError {
    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(String),

    /// Binary layout could not be read or written
    #[error("Binary serialization error: {0}")]
    Binary(String),

    /// A value does not fit the target representation
    #[error("Value out of range for {field}: {value}")]
    OutOfRange { field: &'static str, value: String },

    /// Decimal conversion failed
    #[error("Decimal conversion error: {0}")]
    Decimal(String),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Json(err.to_string())
    }
}
