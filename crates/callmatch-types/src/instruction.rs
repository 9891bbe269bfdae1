//! The decoded instruction stream and the events the core emits back.
//!
//! The transport layer parses wire messages into [`Instruction`] values and
//! feeds them to the session one at a time; the session answers with
//! [`SessionEvent`] records for the transport layer to encode. Field
//! well-formedness (framing, symbol routing, authentication) is the
//! transport's concern and has already happened by the time an instruction
//! reaches the core.

use serde::{Deserialize, Serialize};

use crate::{AuctionOutcome, CancelAck, EnteredOrder, OrderId, Price, Side, Volume};

/// One decoded order-entry instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Enter a limit order as resting interest. Never matches on entry.
    Enter {
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
    /// Cancel all of an order (`volume == 0`) or reduce it so that
    /// `volume` shares remain.
    Cancel {
        id: OrderId,
        side: Side,
        price: Price,
        volume: Volume,
    },
    /// Run the batch auction now. Cadence is the scheduler's decision.
    AuctionTick,
}

/// What the core produced in response to one instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The order now rests in the book.
    Accepted(EnteredOrder),
    /// The order was refused; nothing entered the book.
    Rejected { id: OrderId, reason: String },
    /// Cancellation acknowledgements, one per affected order.
    Canceled(Vec<CancelAck>),
    /// The batch auction ran to completion.
    AuctionComplete(AuctionOutcome),
}
