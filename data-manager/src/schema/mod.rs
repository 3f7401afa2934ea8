//! Record codecs
//!
//! Records serialize two ways:
//! - [`JsonCodec`]: serde_json text, camelCase field names
//! - [`CompactCodec`]: fixed-size binary layout for the universe record

mod codec;
mod compact;

pub use codec::{JsonCodec, RecordCodec};
pub use compact::{CompactCodec, CompactWikipediaUniverse};
