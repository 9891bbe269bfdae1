//! Replay verification for auction outcomes.
//!
//! Two runs over the same book state must produce the exact same trades.
//! The `trade_root` is a single SHA-256 digest over the ordered trade
//! records that lets a replay (or a downstream consumer) verify an
//! auction's output without comparing full payloads.

use callmatch_types::Trade;
use sha2::{Digest, Sha256};

/// Compute the trade root hash over a set of trades.
///
/// Depends on the trade ids, the matched order ids, and the executed
/// prices and volumes — in order. Same trades in the same order always
/// produce the same root.
#[must_use]
pub fn compute_trade_root(trades: &[Trade]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"callmatch:trade_root:v1:");
    hasher.update((trades.len() as u64).to_le_bytes());

    for trade in trades {
        hasher.update(trade.id.0.as_bytes());
        hasher.update(trade.auction_id.0.to_le_bytes());
        hasher.update(trade.buy_order_id.0.to_le_bytes());
        hasher.update(trade.sell_order_id.0.to_le_bytes());
        hasher.update(trade.price.to_le_bytes());
        hasher.update(trade.volume.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Recompute the root from `trades` and compare with `expected_root`.
#[must_use]
pub fn verify_trade_root(trades: &[Trade], expected_root: &[u8; 32]) -> bool {
    let actual = compute_trade_root(trades);
    actual == *expected_root
}
