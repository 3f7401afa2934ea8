//! Security identifier resolution.
//!
//! Data files carry identifier tokens that must be turned into a
//! [`SecurityIdentifier`] before a record can be built. Resolution is a
//! collaborator seam: decoders take a `&dyn SecurityIdentifierResolver`.
//!
//! - [`EncodedIdentifierResolver`]: tokens are already in the encoded form
//!   (`"AAPL R735QTJ8XC9X"`)
//! - [`MappedIdentifierResolver`]: explicit token table, optionally falling
//!   back to another resolver
//!
//! # Example
//!
//! ```ignore
//! use trading_common::instruments::{EncodedIdentifierResolver, SecurityIdentifierResolver};
//!
//! let resolver = EncodedIdentifierResolver;
//! let sid = resolver.resolve("AAPL R735QTJ8XC9X")?;
//! assert_eq!(sid.symbol(), "AAPL");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::security_identifier::{IdentifierError, SecurityIdentifier};

/// Resolves identifier tokens found in data files
pub trait SecurityIdentifierResolver: Send + Sync {
    /// Resolve a raw token into a security identifier
    fn resolve(&self, token: &str) -> Result<SecurityIdentifier, ResolverError>;
}

/// Resolver for tokens written in the encoded identifier format
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedIdentifierResolver;

impl SecurityIdentifierResolver for EncodedIdentifierResolver {
    fn resolve(&self, token: &str) -> Result<SecurityIdentifier, ResolverError> {
        SecurityIdentifier::parse(token).map_err(|source| ResolverError::Invalid {
            token: token.to_string(),
            source,
        })
    }
}

/// Resolver backed by an explicit token table
#[derive(Clone, Default)]
pub struct MappedIdentifierResolver {
    mappings: HashMap<String, SecurityIdentifier>,
    fallback: Option<Arc<dyn SecurityIdentifierResolver>>,
}

impl MappedIdentifierResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token mapping
    pub fn with_mapping(mut self, token: impl Into<String>, id: SecurityIdentifier) -> Self {
        self.mappings.insert(token.into(), id);
        self
    }

    /// Resolver consulted for tokens missing from the table
    pub fn with_fallback(mut self, fallback: Arc<dyn SecurityIdentifierResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl SecurityIdentifierResolver for MappedIdentifierResolver {
    fn resolve(&self, token: &str) -> Result<SecurityIdentifier, ResolverError> {
        if let Some(id) = self.mappings.get(token) {
            return Ok(id.clone());
        }

        match self.fallback {
            Some(ref fallback) => {
                debug!("Token '{}' not mapped, trying fallback resolver", token);
                fallback.resolve(token)
            }
            None => Err(ResolverError::Unmapped(token.to_string())),
        }
    }
}

impl std::fmt::Debug for MappedIdentifierResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedIdentifierResolver")
            .field("mappings", &self.mappings.len())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Errors that can occur during identifier resolution
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolverError {
    #[error("Invalid security identifier '{token}': {source}")]
    Invalid {
        token: String,
        #[source]
        source: IdentifierError,
    },

    #[error("No security identifier mapped for token '{0}'")]
    Unmapped(String),
}
