// trading-common: Shared identifiers, error classification and logging
// Used by data-manager adapters and their command-line tools

pub mod error;
pub mod instruments;
pub mod logging;
