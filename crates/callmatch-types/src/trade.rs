//! Trade records produced by the batch auction.
//!
//! A [`Trade`] is the immutable record of one fill between a resting buy
//! order and a resting sell order at the auction's uniform clearing price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuctionId, OrderId, Price, TradeId, Volume};

/// A single fill from a batch auction.
///
/// All trades within one auction execute at the same clearing price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Deterministic from `auction_id` + fill sequence.
    pub id: TradeId,
    /// The auction cycle that produced this trade.
    pub auction_id: AuctionId,
    /// The buy order that received shares.
    pub buy_order_id: OrderId,
    /// The sell order that supplied shares.
    pub sell_order_id: OrderId,
    /// The uniform clearing price for this auction.
    pub price: Price,
    /// Executed volume in shares.
    pub volume: Volume,
    /// When this trade was executed.
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Notional value in ticks × shares.
    #[must_use]
    pub fn notional(&self) -> u128 {
        u128::from(self.price) * u128::from(self.volume)
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} x {} ({} <- {}, {})",
            self.id, self.volume, self.price, self.buy_order_id, self.sell_order_id, self.auction_id,
        )
    }
}
