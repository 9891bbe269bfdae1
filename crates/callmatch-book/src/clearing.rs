//! Clearing-price discovery for the batch auction.
//!
//! Phase A of the auction: given both sides of the book, find the single
//! uniform price at which all crossing volume will execute. The algorithm
//! is deterministic: same book state → same price.
//!
//! The walk merges every bid level and every ask level into one sequence
//! ordered by descending price — ask before bid at an equal price — and
//! accumulates interest against the full ask-side depth:
//!
//! - If the accumulation hits the ask depth *exactly* at a level boundary
//!   and another level follows, the two levels bracket the market-clearing
//!   interval and the price is the ceiling of their midpoint.
//! - Otherwise the price is the first ask level at which the accumulation
//!   exceeds the ask depth — the marginal ask needed to satisfy demand.
//! - If the walk ends without either, no clearing price exists and the
//!   auction yields zero trades.

use callmatch_types::{Price, Side, Volume};

use crate::ladder::PriceLadder;

/// Result of clearing-price discovery.
#[derive(Debug, Clone)]
pub struct ClearingResult {
    /// The uniform clearing price, if bid and ask interest cross.
    pub clearing_price: Option<Price>,
    /// Full ask-side depth at the time of the walk.
    pub total_ask_volume: Volume,
    /// Best bid at the time of the walk.
    pub best_bid: Option<Price>,
    /// Best ask at the time of the walk.
    pub best_ask: Option<Price>,
}

impl ClearingResult {
    fn no_clearing(total_ask_volume: Volume, best_bid: Option<Price>, best_ask: Option<Price>) -> Self {
        Self {
            clearing_price: None,
            total_ask_volume,
            best_bid,
            best_ask,
        }
    }
}

/// One level in the merged bid/ask walk.
#[derive(Debug, Clone, Copy)]
struct MergedLevel {
    price: Price,
    interest: Volume,
    side: Side,
}

/// Compute the uniform clearing price for the given book sides.
///
/// `bids` must be the buy ladder and `asks` the sell ladder. Neither side
/// is mutated; Phase B consumes the result.
#[must_use]
pub fn compute_clearing_price(bids: &PriceLadder, asks: &PriceLadder) -> ClearingResult {
    debug_assert_eq!(bids.side(), Side::Buy);
    debug_assert_eq!(asks.side(), Side::Sell);

    let total_ask_volume = asks.total_interest();
    let best_bid = bids.best_price();
    let best_ask = asks.best_price();

    // No crossing possible if either side is empty or bid < ask.
    match (best_bid, best_ask) {
        (Some(bid), Some(ask)) if bid >= ask => {}
        _ => return ClearingResult::no_clearing(total_ask_volume, best_bid, best_ask),
    }

    let merged = merge_descending(bids, asks);
    tracing::debug!(
        levels = merged.len(),
        total_ask_volume,
        "clearing walk over merged levels"
    );

    let mut orders_volume: Volume = 0;
    for (i, level) in merged.iter().enumerate() {
        orders_volume += level.interest;
        if orders_volume == total_ask_volume {
            // Exact boundary: this level and the next bracket the clearing
            // interval, so the price is the ceiling of their midpoint.
            if let Some(next) = merged.get(i + 1) {
                let price = midpoint_ceil(level.price, next.price);
                return ClearingResult {
                    clearing_price: Some(price),
                    total_ask_volume,
                    best_bid,
                    best_ask,
                };
            }
        }
        if level.side == Side::Sell && orders_volume > total_ask_volume {
            // The marginal ask: the first ask level the accumulated demand
            // pushes past the full ask depth.
            return ClearingResult {
                clearing_price: Some(level.price),
                total_ask_volume,
                best_bid,
                best_ask,
            };
        }
    }

    ClearingResult::no_clearing(total_ask_volume, best_bid, best_ask)
}

/// Merge both sides into one sequence by descending price.
///
/// At an equal price the ask level precedes the bid level; the tie-break
/// is load-bearing for the boundary-midpoint rule and must stay stable.
fn merge_descending(bids: &PriceLadder, asks: &PriceLadder) -> Vec<MergedLevel> {
    let bids_desc: Vec<MergedLevel> = bids
        .iter()
        .map(|level| MergedLevel {
            price: level.price,
            interest: level.interest(),
            side: Side::Buy,
        })
        .collect();
    let asks_desc: Vec<MergedLevel> = asks
        .iter_rev()
        .map(|level| MergedLevel {
            price: level.price,
            interest: level.interest(),
            side: Side::Sell,
        })
        .collect();

    let mut merged = Vec::with_capacity(bids_desc.len() + asks_desc.len());
    let (mut ai, mut bi) = (0, 0);
    while ai < asks_desc.len() && bi < bids_desc.len() {
        if asks_desc[ai].price >= bids_desc[bi].price {
            merged.push(asks_desc[ai]);
            ai += 1;
        } else {
            merged.push(bids_desc[bi]);
            bi += 1;
        }
    }
    merged.extend_from_slice(&asks_desc[ai..]);
    merged.extend_from_slice(&bids_desc[bi..]);
    merged
}

fn midpoint_ceil(a: Price, b: Price) -> Price {
    // a + b cannot overflow: venue prices are far below u64::MAX / 2.
    (a + b).div_ceil(2)
}
