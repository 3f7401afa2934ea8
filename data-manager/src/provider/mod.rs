//! Alternative data adapters
//!
//! This module defines the adapter interface and the Quiver Quantitative
//! Wikipedia datasets built on it.

pub mod quiver;
mod traits;

pub use traits::*;
