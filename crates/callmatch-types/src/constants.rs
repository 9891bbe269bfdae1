//! Venue-wide constants for the CallMatch book.

use crate::Price;

/// Lowest bid price the venue accepts (inclusive).
pub const MIN_BID: Price = 0;

/// Highest ask price the venue accepts (inclusive).
pub const MAX_ASK: Price = 2_000_000_000;

/// Default batch-auction interval in milliseconds.
pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 3_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "CallMatch";
