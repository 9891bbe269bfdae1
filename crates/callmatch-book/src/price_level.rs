//! A single price level in the order book.
//!
//! Orders at the same price are stored in FIFO order (time priority): the
//! front of the deque has the highest priority and is filled first. The
//! level caches `interest`, the sum of all resting remainders, so depth
//! queries and the clearing-price walk never re-scan the queue.
//!
//! Interest accounting uses checked arithmetic: an underflow means the
//! book corrupted itself and panics rather than trading on bad state.

use std::collections::VecDeque;

use callmatch_types::{BookError, OrderId, Price, Result, Visibility, Volume};

/// One order resting in a level's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RestingOrder {
    id: OrderId,
    remaining: Volume,
}

/// The outcome of draining a level with [`PriceLevelQueue::fill_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFill {
    /// Total volume consumed (≤ requested, ≤ the level's prior interest).
    pub filled: Volume,
    /// Per-order fills in time-priority order.
    pub fills: Vec<(OrderId, Volume)>,
}

/// All orders resting at one exact price, in time priority.
#[derive(Debug, Clone)]
pub struct PriceLevelQueue {
    /// The price at this level. Immutable once created.
    pub price: Price,
    /// Front = oldest = highest priority.
    orders: VecDeque<RestingOrder>,
    /// Cached sum of all resting remainders.
    interest: Volume,
}

impl PriceLevelQueue {
    /// Create a new empty price level.
    #[must_use]
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            interest: 0,
        }
    }

    /// Append a new order at the back (lowest time priority).
    ///
    /// Rejects an id already resting here without touching state.
    pub fn add_order(&mut self, id: OrderId, volume: Volume) -> Result<()> {
        debug_assert!(volume > 0, "zero-volume order reached a price level");
        if self.contains(id) {
            return Err(BookError::DuplicateOrder(id));
        }
        self.orders.push_back(RestingOrder { id, remaining: volume });
        self.interest += volume;
        Ok(())
    }

    /// Remove an order entirely, returning its freed remaining volume.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<Volume> {
        let pos = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(BookError::OrderNotFound(id))?;
        let order = self.orders.remove(pos).ok_or(BookError::OrderNotFound(id))?;
        self.debit_interest(order.remaining);
        Ok(order.remaining)
    }

    /// Shrink an order to `new_remaining` shares, returning the freed delta.
    ///
    /// Reductions are downward only: `new_remaining` must be strictly less
    /// than the current remainder. Reducing to zero removes the order as in
    /// [`Self::cancel_order`].
    pub fn reduce_order(&mut self, id: OrderId, new_remaining: Volume) -> Result<Volume> {
        let pos = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(BookError::OrderNotFound(id))?;
        let current = self.orders[pos].remaining;
        if new_remaining >= current {
            return Err(BookError::InvalidReduction {
                order_id: id,
                current,
                requested: new_remaining,
            });
        }
        if new_remaining == 0 {
            self.orders.remove(pos);
        } else {
            self.orders[pos].remaining = new_remaining;
        }
        let delta = current - new_remaining;
        self.debit_interest(delta);
        Ok(delta)
    }

    /// Consume up to `volume_to_fill` shares strictly oldest-first.
    ///
    /// Fully-consumed orders leave the queue; the last order touched may be
    /// partially reduced in place. Never over-fills an order and never
    /// reports more volume than the level held.
    pub fn fill_order(&mut self, volume_to_fill: Volume) -> LevelFill {
        let mut fills = Vec::new();
        let mut unfilled = volume_to_fill;
        while unfilled > 0 {
            let Some(front) = self.orders.front_mut() else {
                break;
            };
            if front.remaining <= unfilled {
                let (id, taken) = (front.id, front.remaining);
                self.orders.pop_front();
                fills.push((id, taken));
                unfilled -= taken;
            } else {
                front.remaining -= unfilled;
                fills.push((front.id, unfilled));
                unfilled = 0;
            }
        }
        let filled = volume_to_fill - unfilled;
        self.debit_interest(filled);
        LevelFill { filled, fills }
    }

    /// Aggregate resting volume at this level.
    #[must_use]
    pub fn interest(&self) -> Volume {
        self.interest
    }

    /// Number of orders resting at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// `true` if no orders rest at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// O(n) membership test by order id.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.iter().any(|o| o.id == id)
    }

    /// The remaining volume of a resting order, if present.
    #[must_use]
    pub fn resting_volume(&self, id: OrderId) -> Option<Volume> {
        self.orders.iter().find(|o| o.id == id).map(|o| o.remaining)
    }

    /// Resting orders in time-priority order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = (OrderId, Volume)> + '_ {
        self.orders.iter().map(|o| (o.id, o.remaining))
    }

    fn debit_interest(&mut self, delta: Volume) {
        self.interest = self
            .interest
            .checked_sub(delta)
            .expect("price level interest underflow");
    }
}

// ---------------------------------------------------------------------------
// Lit/dark partitioned variant
// ---------------------------------------------------------------------------

/// A price level partitioned by order visibility.
///
/// Venues running a lit/dark book keep two time-priority sub-queues at each
/// price and fill all lit interest before any dark interest. Everything
/// else matches the [`PriceLevelQueue`] contract; visibility is fixed at
/// entry and order ids are unique across both partitions.
#[derive(Debug, Clone)]
pub struct LitDarkLevelQueue {
    /// The price at this level. Immutable once created.
    pub price: Price,
    lit: PriceLevelQueue,
    dark: PriceLevelQueue,
}

impl LitDarkLevelQueue {
    /// Create a new empty partitioned level.
    #[must_use]
    pub fn new(price: Price) -> Self {
        Self {
            price,
            lit: PriceLevelQueue::new(price),
            dark: PriceLevelQueue::new(price),
        }
    }

    /// Append a new order to the back of its visibility partition.
    pub fn add_order(&mut self, id: OrderId, volume: Volume, visibility: Visibility) -> Result<()> {
        if self.contains(id) {
            return Err(BookError::DuplicateOrder(id));
        }
        match visibility {
            Visibility::Lit => self.lit.add_order(id, volume),
            Visibility::Dark => self.dark.add_order(id, volume),
        }
    }

    /// Remove an order entirely, whichever partition holds it.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<Volume> {
        if self.lit.contains(id) {
            self.lit.cancel_order(id)
        } else {
            self.dark.cancel_order(id)
        }
    }

    /// Downward-only resize, as in [`PriceLevelQueue::reduce_order`].
    pub fn reduce_order(&mut self, id: OrderId, new_remaining: Volume) -> Result<Volume> {
        if self.lit.contains(id) {
            self.lit.reduce_order(id, new_remaining)
        } else {
            self.dark.reduce_order(id, new_remaining)
        }
    }

    /// Consume up to `volume_to_fill` shares, lit partition first.
    pub fn fill_order(&mut self, volume_to_fill: Volume) -> LevelFill {
        let mut fill = self.lit.fill_order(volume_to_fill);
        if fill.filled < volume_to_fill {
            let dark_fill = self.dark.fill_order(volume_to_fill - fill.filled);
            fill.filled += dark_fill.filled;
            fill.fills.extend(dark_fill.fills);
        }
        fill
    }

    /// Aggregate resting volume across both partitions.
    #[must_use]
    pub fn interest(&self) -> Volume {
        self.lit.interest() + self.dark.interest()
    }

    /// Number of orders resting at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lit.len() + self.dark.len()
    }

    /// `true` if no orders rest at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lit.is_empty() && self.dark.is_empty()
    }

    /// Membership test across both partitions.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.lit.contains(id) || self.dark.contains(id)
    }

    /// The partition an order rests in, if present.
    #[must_use]
    pub fn visibility_of(&self, id: OrderId) -> Option<Visibility> {
        if self.lit.contains(id) {
            Some(Visibility::Lit)
        } else if self.dark.contains(id) {
            Some(Visibility::Dark)
        } else {
            None
        }
    }
}
