//! Instrument identification shared by every data adapter.
//!
//! # Components
//! - [`SecurityIdentifier`]: stable encoded identifier (`"AAPL R735QTJ8XC9X"`)
//! - [`Symbol`]: identifier paired with its display ticker
//! - [`SecurityIdentifierResolver`]: turns file tokens into identifiers
//!
//! # Example
//!
//! ```ignore
//! use trading_common::instruments::{SecurityIdentifier, SecurityType, Symbol};
//!
//! let id = SecurityIdentifier::parse("AAPL R735QTJ8XC9X")?;
//! assert_eq!(id.security_type(), SecurityType::Equity);
//! assert_eq!(id.market(), "usa");
//!
//! let symbol = Symbol::new(id, "AAPL");
//! ```

mod security_identifier;
mod symbol;
mod symbol_resolver;

pub use security_identifier::{
    decode_base36, encode_base36, IdentifierError, Market, SecurityIdentifier, SecurityType,
};
pub use symbol::Symbol;
pub use symbol_resolver::{
    EncodedIdentifierResolver, MappedIdentifierResolver, ResolverError,
    SecurityIdentifierResolver,
};
