//! Order-entry types for the CallMatch book.
//!
//! Prices are integer ticks and volumes integer shares — the venue model
//! has no fractional quantities. An order's time priority is implicit in
//! its position within its price level's FIFO queue, so the book never
//! stores a free-standing order entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrderId;

/// Price in integer ticks.
pub type Price = u64;

/// Volume in integer shares.
pub type Volume = u64;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side this one trades against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Whether an order is displayed (lit) or hidden (dark).
///
/// Immutable once set at entry. Venues running a partitioned book fill lit
/// interest before dark interest at the same price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Visibility {
    Lit,
    Dark,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lit => write!(f, "LIT"),
            Self::Dark => write!(f, "DARK"),
        }
    }
}

/// Acknowledgement that an order was entered into the book.
///
/// Produced by `enter_buy` / `enter_sell`; the transport layer encodes it
/// as the order-accepted execution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnteredOrder {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub volume: Volume,
    pub entered_at: DateTime<Utc>,
}

/// Acknowledgement of a cancel or reduction.
///
/// `amount_canceled == 0` means the instruction had no effect (absent
/// order, absent level, or a reduction that was not strictly downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAck {
    pub id: OrderId,
    pub amount_canceled: Volume,
}

impl std::fmt::Display for CancelAck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} canceled {}", self.id, self.amount_canceled)
    }
}
