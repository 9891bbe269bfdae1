//! Auction outcome types.
//!
//! One [`AuctionOutcome`] is produced per batch tick. Given the same book
//! state, the outcome is fully deterministic — same trades, same trade
//! root, same clearing price.

use serde::{Deserialize, Serialize};

use crate::{AuctionId, Price, Trade, Volume};

/// The result of one batch-auction cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionOutcome {
    /// The auction cycle that produced these trades.
    pub auction_id: AuctionId,
    /// The uniform clearing price, if bid and ask interest crossed.
    pub clearing_price: Option<Price>,
    /// Full ask-side depth at the start of the auction.
    pub total_ask_volume: Volume,
    /// The trades executed, in fill order.
    pub trades: Vec<Trade>,
    /// SHA-256 digest over the ordered trades (for replay verification).
    pub trade_root: [u8; 32],
}

impl AuctionOutcome {
    /// Total executed volume. Equal on both sides of the book.
    #[must_use]
    pub fn executed_volume(&self) -> Volume {
        self.trades.iter().map(|t| t.volume).sum()
    }

    /// `true` if the auction found no crossing interest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
