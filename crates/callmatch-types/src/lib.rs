//! # callmatch-types
//!
//! Shared types, errors, and configuration for the **CallMatch** batch-auction
//! matching core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`AuctionId`], [`TradeId`], [`Symbol`]
//! - **Order model**: [`Side`], [`Visibility`], [`EnteredOrder`], [`CancelAck`]
//! - **Trade model**: [`Trade`]
//! - **Auction model**: [`AuctionOutcome`]
//! - **Instruction stream**: [`Instruction`], [`SessionEvent`]
//! - **Configuration**: [`BatchConfig`]
//! - **Errors**: [`BookError`] with `CM_ERR_` prefix codes
//! - **Constants**: venue-wide limits and defaults

pub mod auction;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod instruction;
pub mod order;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use callmatch_types::{Side, Trade, AuctionOutcome, ...};

pub use auction::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use instruction::*;
pub use order::*;
pub use trade::*;

// Constants are accessed via `callmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
