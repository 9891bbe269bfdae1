//! Instruction-driven trading session for one instrument.
//!
//! The transport layer decodes wire messages into [`Instruction`] values
//! and feeds them here one at a time; every call returns a single
//! [`SessionEvent`] for it to encode back out. The session never blocks
//! and never schedules itself — the external scheduler decides when to
//! send `AuctionTick`, using [`MatchingSession::batch_interval`] as its
//! cadence hint.

use std::time::Duration;

use callmatch_types::{BatchConfig, Instruction, SessionEvent, Side, Symbol};

use crate::book::OrderBook;

/// One trading session: a book plus its venue configuration.
#[derive(Debug)]
pub struct MatchingSession {
    book: OrderBook,
    config: BatchConfig,
}

impl MatchingSession {
    /// Open a session for `symbol` with the given configuration.
    #[must_use]
    pub fn new(symbol: Symbol, config: BatchConfig) -> Self {
        Self {
            book: OrderBook::new(symbol),
            config,
        }
    }

    /// Open a session with the venue defaults.
    #[must_use]
    pub fn with_defaults(symbol: Symbol) -> Self {
        Self::new(symbol, BatchConfig::default())
    }

    /// Read access to the underlying book.
    #[must_use]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// The cadence at which the scheduler should tick the auction.
    #[must_use]
    pub fn batch_interval(&self) -> Duration {
        self.config.batch_interval
    }

    /// Apply one decoded instruction and produce its response event.
    pub fn apply(&mut self, instruction: Instruction) -> SessionEvent {
        match instruction {
            Instruction::Enter {
                id,
                side,
                price,
                volume,
            } => {
                if !self.config.band_contains(price) {
                    tracing::debug!(%id, price, "order rejected: price outside venue band");
                    return SessionEvent::Rejected {
                        id,
                        reason: format!(
                            "price {price} outside venue band [{}, {}]",
                            self.config.min_bid, self.config.max_ask
                        ),
                    };
                }
                let entered = match side {
                    Side::Buy => self.book.enter_buy(id, price, volume),
                    Side::Sell => self.book.enter_sell(id, price, volume),
                };
                match entered {
                    Ok(order) => SessionEvent::Accepted(order),
                    Err(err) => SessionEvent::Rejected {
                        id,
                        reason: err.to_string(),
                    },
                }
            }
            Instruction::Cancel {
                id,
                side,
                price,
                volume,
            } => SessionEvent::Canceled(self.book.cancel_order(id, price, volume, side)),
            Instruction::AuctionTick => {
                SessionEvent::AuctionComplete(self.book.run_batch_auction())
            }
        }
    }
}
