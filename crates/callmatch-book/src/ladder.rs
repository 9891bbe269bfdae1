//! The sorted price-level index for one side of the book.
//!
//! ## Architecture
//!
//! A hybrid structure, tuned for order flow that clusters near the top of
//! book:
//!
//! - **`slab::Slab`**: arena of level nodes addressed by stable `usize`
//!   keys — the doubly-linked ordering lives in node indices, never raw
//!   pointers
//! - **`HashMap`**: price → slab key side-car for O(1) lookup and removal
//! - **head/tail cursors**: O(1) best-of-book access and bidirectional
//!   ordered traversal
//!
//! Insertion walks from the head and is O(k) in the number of levels
//! between the head and the insertion point; removal anywhere is O(1).
//!
//! ## Price Ordering
//!
//! - **Bids**: sorted high-to-low (best bid = highest price)
//! - **Asks**: sorted low-to-high (best ask = lowest price)

use std::collections::HashMap;

use callmatch_types::{BookError, Price, Result, Side, Volume};
use slab::Slab;

use crate::price_level::PriceLevelQueue;

/// One level in the ladder's linked ordering. Links are slab keys.
#[derive(Debug)]
struct LevelNode {
    level: PriceLevelQueue,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Sorted collection of the active price levels on one side.
///
/// Levels are created lazily through [`PriceLadder::get_or_create`] and
/// must be removed the moment their interest reaches zero — every price
/// present in the index is expected to carry resting volume once the
/// enclosing book operation completes.
#[derive(Debug)]
pub struct PriceLadder {
    side: Side,
    arena: Slab<LevelNode>,
    index: HashMap<Price, usize>,
    /// Best level for this side's ordering.
    head: Option<usize>,
    /// Worst level for this side's ordering.
    tail: Option<usize>,
}

impl PriceLadder {
    /// Create an empty ladder for the given side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            arena: Slab::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Create a ladder with pre-allocated level capacity.
    #[must_use]
    pub fn with_capacity(side: Side, levels: usize) -> Self {
        Self {
            side,
            arena: Slab::with_capacity(levels),
            index: HashMap::with_capacity(levels),
            head: None,
            tail: None,
        }
    }

    /// Which side's priority ordering this ladder maintains.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// `true` if `a` outranks `b` in this side's priority order.
    fn comes_before(&self, a: Price, b: Price) -> bool {
        match self.side {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.index.contains_key(&price)
    }

    /// O(1) lookup. Never creates a level.
    #[must_use]
    pub fn get(&self, price: Price) -> Option<&PriceLevelQueue> {
        self.index.get(&price).map(|&key| &self.arena[key].level)
    }

    /// O(1) mutable lookup. Never creates a level.
    pub fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevelQueue> {
        self.index
            .get(&price)
            .map(|&key| &mut self.arena[key].level)
    }

    /// The level at `price`, creating an empty one at the correct sorted
    /// position if absent.
    ///
    /// This is the only path that materializes a level: plain lookups never
    /// create. Callers that leave the returned level empty are expected to
    /// [`Self::remove`] it before the enclosing operation completes.
    pub fn get_or_create(&mut self, price: Price) -> &mut PriceLevelQueue {
        let key = match self.index.get(&price) {
            Some(&key) => key,
            None => self.link_new(price),
        };
        &mut self.arena[key].level
    }

    /// Insert an empty level at `price`.
    ///
    /// Internal insert contract: fails with `DuplicateLevel` when the key
    /// already exists. Unreachable through [`Self::get_or_create`].
    pub fn insert(&mut self, price: Price) -> Result<&mut PriceLevelQueue> {
        if self.contains(price) {
            return Err(BookError::DuplicateLevel(price));
        }
        let key = self.link_new(price);
        Ok(&mut self.arena[key].level)
    }

    /// Allocate a node for `price` and splice it into the linked ordering.
    fn link_new(&mut self, price: Price) -> usize {
        let key = self.arena.insert(LevelNode {
            level: PriceLevelQueue::new(price),
            prev: None,
            next: None,
        });
        self.index.insert(price, key);

        let Some(head_key) = self.head else {
            self.head = Some(key);
            self.tail = Some(key);
            return key;
        };

        if self.comes_before(price, self.arena[head_key].level.price) {
            self.arena[head_key].prev = Some(key);
            self.arena[key].next = Some(head_key);
            self.head = Some(key);
            return key;
        }

        // Walk to the last node that outranks the new price. Ties cannot
        // occur: price is the index key.
        let mut current = head_key;
        while let Some(next_key) = self.arena[current].next {
            if self.comes_before(self.arena[next_key].level.price, price) {
                current = next_key;
            } else {
                break;
            }
        }

        let next = self.arena[current].next;
        self.arena[key].prev = Some(current);
        self.arena[key].next = next;
        self.arena[current].next = Some(key);
        match next {
            Some(next_key) => self.arena[next_key].prev = Some(key),
            None => self.tail = Some(key),
        }
        key
    }

    /// Detach and discard the level at `price`. No-op if absent.
    pub fn remove(&mut self, price: Price) {
        let Some(key) = self.index.remove(&price) else {
            return;
        };
        let node = self.arena.remove(key);
        match node.prev {
            Some(prev_key) => self.arena[prev_key].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next_key) => self.arena[next_key].prev = node.prev,
            None => self.tail = node.prev,
        }
    }

    /// The best level for this side, if any. O(1).
    #[must_use]
    pub fn best(&self) -> Option<&PriceLevelQueue> {
        self.head.map(|key| &self.arena[key].level)
    }

    /// The best price for this side, if any. O(1).
    #[must_use]
    pub fn best_price(&self) -> Option<Price> {
        self.best().map(|level| level.price)
    }

    /// Number of active price levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if no levels are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Aggregate resting volume across every level.
    #[must_use]
    pub fn total_interest(&self) -> Volume {
        self.iter().map(PriceLevelQueue::interest).sum()
    }

    /// Levels in this side's priority order (best first).
    ///
    /// Lazy, restartable, finite. Reflects all structural mutation made
    /// before the traversal starts; the borrow rules forbid mutating the
    /// ladder while a traversal is live.
    #[must_use]
    pub fn iter(&self) -> LadderIter<'_> {
        LadderIter {
            arena: &self.arena,
            cursor: self.head,
            forward: true,
        }
    }

    /// Levels in reverse priority order (worst first).
    #[must_use]
    pub fn iter_rev(&self) -> LadderIter<'_> {
        LadderIter {
            arena: &self.arena,
            cursor: self.tail,
            forward: false,
        }
    }
}

/// Ordered traversal over a [`PriceLadder`].
#[derive(Debug)]
pub struct LadderIter<'a> {
    arena: &'a Slab<LevelNode>,
    cursor: Option<usize>,
    forward: bool,
}

impl<'a> Iterator for LadderIter<'a> {
    type Item = &'a PriceLevelQueue;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = &self.arena[key];
        self.cursor = if self.forward { node.next } else { node.prev };
        Some(&node.level)
    }
}
