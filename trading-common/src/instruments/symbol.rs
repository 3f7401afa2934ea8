//! Symbol: a security identifier paired with its current display ticker.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::security_identifier::SecurityIdentifier;

/// Identifier plus the ticker it trades under on the data date
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Stable encoded identifier
    pub id: SecurityIdentifier,
    /// Human-readable ticker (e.g., "AAPL")
    pub value: String,
}

impl Symbol {
    pub fn new(id: SecurityIdentifier, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
