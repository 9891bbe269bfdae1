//! # callmatch-book
//!
//! **The matching core of the CallMatch exchange simulator.**
//!
//! A price-time limit order book cleared by periodic batch (call) auctions:
//! resting interest accumulates between ticks, and each tick computes one
//! uniform clearing price and executes all crossing volume at it. The core
//! is strictly single-threaded and side-effect free toward the outside
//! world — no I/O, no timers, no matching on entry.
//!
//! - [`PriceLevelQueue`] — FIFO time-priority queue of orders at one price
//! - [`PriceLadder`] — sorted price-level index per side (arena-backed)
//! - [`compute_clearing_price`] — uniform clearing-price discovery
//! - [`OrderBook`] — both sides plus the batch-auction sweep
//! - [`MatchingSession`] — applies the decoded instruction stream

pub mod book;
pub mod clearing;
pub mod determinism;
pub mod ladder;
pub mod price_level;
pub mod session;

pub use book::OrderBook;
pub use clearing::{ClearingResult, compute_clearing_price};
pub use determinism::{compute_trade_root, verify_trade_root};
pub use ladder::PriceLadder;
pub use price_level::{LevelFill, LitDarkLevelQueue, PriceLevelQueue};
pub use session::MatchingSession;
