//! Book and scheduler configuration.
//!
//! The core never sleeps or sets timers: `batch_interval` is advisory for
//! the transport layer's scheduler, which owns auction cadence (§ the
//! single-threaded execution model).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Price, constants};

/// Configuration for one trading session of a single instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// How often the external scheduler should tick the batch auction.
    pub batch_interval: Duration,
    /// Lowest acceptable bid price (inclusive).
    pub min_bid: Price,
    /// Highest acceptable ask price (inclusive).
    pub max_ask: Price,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_interval: Duration::from_millis(constants::DEFAULT_BATCH_INTERVAL_MS),
            min_bid: constants::MIN_BID,
            max_ask: constants::MAX_ASK,
        }
    }
}

impl BatchConfig {
    /// `true` if `price` lies within the venue's accepted band.
    #[must_use]
    pub fn band_contains(&self, price: Price) -> bool {
        (self.min_bid..=self.max_ask).contains(&price)
    }
}
