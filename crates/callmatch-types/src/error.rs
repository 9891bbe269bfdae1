//! Error types for the CallMatch book.
//!
//! All errors use the `CM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Price-ladder errors
//!
//! Every variant is recoverable and local to one instruction — none should
//! propagate as a fatal condition out of the core. Internal invariant
//! violations (interest underflow, over-fill) are not represented here:
//! they indicate a correctness bug in the core and panic instead.

use thiserror::Error;

use crate::{OrderId, Price, Volume};

/// Central error enum for all book operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The referenced order is not resting at the given price level.
    #[error("CM_ERR_100: order not found: {0}")]
    OrderNotFound(OrderId),

    /// An order with this ID is already resting at that price level.
    #[error("CM_ERR_101: order already resting: {0}")]
    DuplicateOrder(OrderId),

    /// A reduction must leave strictly less volume than currently rests.
    #[error("CM_ERR_102: invalid reduction for {order_id}: requested {requested} >= current {current}")]
    InvalidReduction {
        order_id: OrderId,
        current: Volume,
        requested: Volume,
    },

    /// The order failed entry validation (zero volume, price out of band).
    #[error("CM_ERR_103: invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: OrderId, reason: String },

    // =================================================================
    // Price-Ladder Errors (2xx)
    // =================================================================
    /// A level at this price already exists (internal insert path only).
    #[error("CM_ERR_200: price level already present: {0}")]
    DuplicateLevel(Price),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BookError>;
