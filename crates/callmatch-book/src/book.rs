//! The order book for a single instrument, cleared by batch auctions.
//!
//! Two [`PriceLadder`]s (bids highest-first, asks lowest-first) accumulate
//! resting interest between ticks. Order entry never matches — all
//! execution happens inside [`OrderBook::run_batch_auction`], which
//! computes one uniform clearing price and sweeps every crossing order
//! at it. Between auctions the sides may cross; resolving the crossing is
//! exactly the auction's job.

use callmatch_types::{
    AuctionId, AuctionOutcome, BookError, CancelAck, EnteredOrder, OrderId, Price, Result, Side,
    Symbol, Trade, TradeId, Volume,
};
use chrono::Utc;

use crate::clearing::compute_clearing_price;
use crate::determinism::compute_trade_root;
use crate::ladder::PriceLadder;
use crate::price_level::PriceLevelQueue;

/// The order book for one instrument.
#[derive(Debug)]
pub struct OrderBook {
    /// The instrument this book trades.
    pub symbol: Symbol,
    /// Buy side: highest price first.
    bids: PriceLadder,
    /// Sell side: lowest price first.
    asks: PriceLadder,
    /// The next auction cycle to run.
    next_auction: AuctionId,
}

impl OrderBook {
    /// Create a new empty book for the given instrument.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: PriceLadder::new(Side::Buy),
            asks: PriceLadder::new(Side::Sell),
            next_auction: AuctionId(0),
        }
    }

    // =================================================================
    // Order entry
    // =================================================================

    /// Enter a limit order to buy. Does **not** attempt to match.
    pub fn enter_buy(&mut self, id: OrderId, price: Price, volume: Volume) -> Result<EnteredOrder> {
        self.enter(Side::Buy, id, price, volume)
    }

    /// Enter a limit order to sell. Does **not** attempt to match.
    pub fn enter_sell(&mut self, id: OrderId, price: Price, volume: Volume) -> Result<EnteredOrder> {
        self.enter(Side::Sell, id, price, volume)
    }

    fn enter(&mut self, side: Side, id: OrderId, price: Price, volume: Volume) -> Result<EnteredOrder> {
        if volume == 0 {
            return Err(BookError::InvalidOrder {
                order_id: id,
                reason: "zero volume".into(),
            });
        }
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        match ladder.get_or_create(price).add_order(id, volume) {
            Ok(()) => {
                tracing::debug!(%id, %side, price, volume, "order entered");
                Ok(EnteredOrder {
                    id,
                    side,
                    price,
                    volume,
                    entered_at: Utc::now(),
                })
            }
            Err(err) => {
                // A rejected add must not leave behind the level it
                // lazily materialized.
                if ladder.get(price).is_some_and(PriceLevelQueue::is_empty) {
                    ladder.remove(price);
                }
                Err(err)
            }
        }
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Cancel all or part of a resting order.
    ///
    /// `volume` is the number of shares desired to *remain*: `0` cancels
    /// the order outright, any other value must be strictly below the
    /// current remainder. Absent orders, absent levels, and non-downward
    /// reductions all acknowledge with `amount_canceled == 0`.
    pub fn cancel_order(
        &mut self,
        id: OrderId,
        price: Price,
        volume: Volume,
        side: Side,
    ) -> Vec<CancelAck> {
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let amount_canceled = match ladder.get_mut(price) {
            None => {
                tracing::debug!(%id, price, "no level at price, cancel ignored");
                0
            }
            Some(level) => {
                let result = if volume == 0 {
                    level.cancel_order(id)
                } else {
                    level.reduce_order(id, volume)
                };
                match result {
                    Ok(freed) => freed,
                    Err(err) => {
                        tracing::debug!(%id, price, %err, "cancel ignored");
                        0
                    }
                }
            }
        };
        if ladder.get(price).is_some_and(PriceLevelQueue::is_empty) {
            ladder.remove(price);
        }
        vec![CancelAck { id, amount_canceled }]
    }

    // =================================================================
    // Batch auction
    // =================================================================

    /// Run one batch auction: discover the clearing price, then sweep all
    /// crossing orders at it. Runs to completion before returning.
    pub fn run_batch_auction(&mut self) -> AuctionOutcome {
        let auction_id = self.next_auction;
        self.next_auction = auction_id.next();

        let clearing = compute_clearing_price(&self.bids, &self.asks);
        tracing::debug!(
            symbol = %self.symbol,
            auction = auction_id.0,
            clearing_price = ?clearing.clearing_price,
            total_ask_volume = clearing.total_ask_volume,
            best_bid = ?clearing.best_bid,
            best_ask = ?clearing.best_ask,
            "batch auction tick"
        );

        let trades = match clearing.clearing_price {
            Some(price) => self.sweep(auction_id, price),
            None => Vec::new(),
        };

        let trade_root = compute_trade_root(&trades);
        tracing::info!(
            symbol = %self.symbol,
            auction = auction_id.0,
            trades = trades.len(),
            executed_volume = trades.iter().map(|t| t.volume).sum::<Volume>(),
            clearing_price = ?clearing.clearing_price,
            trade_root = %hex::encode(trade_root),
            "batch auction complete"
        );

        AuctionOutcome {
            auction_id,
            clearing_price: clearing.clearing_price,
            total_ask_volume: clearing.total_ask_volume,
            trades,
            trade_root,
        }
    }

    /// Phase B: execute every crossing order at the clearing price.
    ///
    /// Bid levels are consumed best (highest) first and, within a level,
    /// in time priority; fills are pulled from the best (lowest) ask level
    /// at or below the clearing price, advancing as levels empty. Levels
    /// are removed the moment their interest reaches zero, so no empty
    /// level survives the auction.
    fn sweep(&mut self, auction_id: AuctionId, clearing_price: Price) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut fill_seq: u64 = 0;

        let bid_prices: Vec<Price> = self
            .bids
            .iter()
            .map(|level| level.price)
            .take_while(|&p| p >= clearing_price)
            .collect();

        'sweep: for bid_price in bid_prices {
            let resting: Vec<(OrderId, Volume)> = match self.bids.get(bid_price) {
                Some(level) => level.iter().collect(),
                None => continue,
            };
            for (bid_id, volume) in resting {
                let mut volume_filled: Volume = 0;
                while volume_filled < volume {
                    let Some(ask_price) = self.asks.best_price() else {
                        break;
                    };
                    if ask_price > clearing_price {
                        break;
                    }
                    let Some(ask_level) = self.asks.get_mut(ask_price) else {
                        break;
                    };
                    let fill = ask_level.fill_order(volume - volume_filled);
                    let ask_exhausted = ask_level.is_empty();
                    volume_filled += fill.filled;
                    for (ask_id, fill_volume) in fill.fills {
                        trades.push(Trade {
                            id: TradeId::deterministic(auction_id.0, fill_seq),
                            auction_id,
                            buy_order_id: bid_id,
                            sell_order_id: ask_id,
                            price: clearing_price,
                            volume: fill_volume,
                            executed_at: Utc::now(),
                        });
                        fill_seq += 1;
                        tracing::debug!(
                            buy = %bid_id,
                            sell = %ask_id,
                            price = clearing_price,
                            volume = fill_volume,
                            "trade matched"
                        );
                    }
                    if ask_exhausted {
                        self.asks.remove(ask_price);
                    }
                }

                debug_assert!(volume_filled <= volume, "bid order over-filled in sweep");
                if volume_filled > 0 {
                    if let Some(bid_level) = self.bids.get_mut(bid_price) {
                        let settled = if volume_filled == volume {
                            bid_level.cancel_order(bid_id)
                        } else {
                            bid_level.reduce_order(bid_id, volume - volume_filled)
                        };
                        debug_assert!(settled.is_ok(), "swept bid order missing from its level");
                    }
                    if self.bids.get(bid_price).is_some_and(PriceLevelQueue::is_empty) {
                        self.bids.remove(bid_price);
                    }
                }

                // Stop once no ask at or below the clearing price remains.
                if self.asks.best_price().is_none_or(|p| p > clearing_price) {
                    break 'sweep;
                }
            }
        }
        trades
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Best (highest) bid price, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best (lowest) ask price, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// `true` if the sides currently cross (best bid ≥ best ask).
    ///
    /// Expected between auctions; never true immediately after one.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Number of distinct bid price levels.
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of distinct ask price levels.
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// Aggregate resting bid volume across all levels.
    #[must_use]
    pub fn bid_interest(&self) -> Volume {
        self.bids.total_interest()
    }

    /// Aggregate resting ask volume across all levels.
    #[must_use]
    pub fn ask_interest(&self) -> Volume {
        self.asks.total_interest()
    }

    /// `true` if the book holds no resting orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// The bid-side ladder (read only).
    #[must_use]
    pub fn bids(&self) -> &PriceLadder {
        &self.bids
    }

    /// The ask-side ladder (read only).
    #[must_use]
    pub fn asks(&self) -> &PriceLadder {
        &self.asks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> OrderBook {
        OrderBook::new(Symbol::new("XYZ"))
    }

    fn trade_tuples(outcome: &AuctionOutcome) -> Vec<(u64, u64, Price, Volume)> {
        outcome
            .trades
            .iter()
            .map(|t| (t.buy_order_id.0, t.sell_order_id.0, t.price, t.volume))
            .collect()
    }

    #[test]
    fn entry_rests_without_matching() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        book.enter_sell(OrderId(2), 8, 5).unwrap();
        // Crossed, but nothing matched: matching is the auction's job.
        assert!(book.is_crossed());
        assert_eq!(book.bid_interest(), 5);
        assert_eq!(book.ask_interest(), 5);
    }

    #[test]
    fn entry_rejects_zero_volume() {
        let mut book = book();
        let err = book.enter_buy(OrderId(1), 10, 0).unwrap_err();
        assert!(matches!(err, BookError::InvalidOrder { .. }));
        assert!(book.is_empty());
    }

    #[test]
    fn duplicate_entry_rejected_without_corruption() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        let err = book.enter_buy(OrderId(1), 10, 3).unwrap_err();
        assert_eq!(err, BookError::DuplicateOrder(OrderId(1)));
        assert_eq!(book.bid_interest(), 5);
        assert_eq!(book.bid_depth(), 1);
    }

    #[test]
    fn matched_auction_empties_both_sides() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        book.enter_sell(OrderId(2), 10, 5).unwrap();

        let outcome = book.run_batch_auction();
        assert_eq!(outcome.clearing_price, Some(10));
        assert_eq!(trade_tuples(&outcome), vec![(1, 2, 10, 5)]);
        assert!(book.is_empty());
        assert_eq!(book.bid_depth(), 0);
        assert_eq!(book.ask_depth(), 0);
    }

    #[test]
    fn auction_sweeps_multiple_ask_levels() {
        let mut book = book();
        book.enter_buy(OrderId(1), 12, 10).unwrap();
        book.enter_sell(OrderId(2), 8, 4).unwrap();
        book.enter_sell(OrderId(3), 9, 4).unwrap();

        let outcome = book.run_batch_auction();
        assert_eq!(outcome.clearing_price, Some(9));
        assert_eq!(outcome.total_ask_volume, 8);
        // Best (lowest) ask fills first; every trade prints at 9.
        assert_eq!(trade_tuples(&outcome), vec![(1, 2, 9, 4), (1, 3, 9, 4)]);
        // The bid rests with its remainder.
        assert_eq!(book.bid_interest(), 2);
        assert_eq!(book.best_bid(), Some(12));
        assert_eq!(book.ask_depth(), 0);
    }

    #[test]
    fn no_crossing_yields_no_trades() {
        let mut book = book();
        book.enter_buy(OrderId(1), 9, 5).unwrap();
        book.enter_sell(OrderId(2), 11, 5).unwrap();

        let outcome = book.run_batch_auction();
        assert_eq!(outcome.clearing_price, None);
        assert!(outcome.trades.is_empty());
        assert_eq!(book.bid_interest(), 5);
        assert_eq!(book.ask_interest(), 5);
    }

    #[test]
    fn auction_ids_are_sequential() {
        let mut book = book();
        assert_eq!(book.run_batch_auction().auction_id, AuctionId(0));
        assert_eq!(book.run_batch_auction().auction_id, AuctionId(1));
    }

    #[test]
    fn full_cancel_removes_order_and_level() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        let acks = book.cancel_order(OrderId(1), 10, 0, Side::Buy);
        assert_eq!(acks, vec![CancelAck { id: OrderId(1), amount_canceled: 5 }]);
        assert_eq!(book.bid_depth(), 0);

        // Re-entry at the same price recreates the level.
        book.enter_buy(OrderId(2), 10, 3).unwrap();
        assert_eq!(book.bid_depth(), 1);
        assert_eq!(book.bid_interest(), 3);
    }

    #[test]
    fn partial_cancel_reduces_to_requested_remainder() {
        let mut book = book();
        book.enter_sell(OrderId(1), 10, 8).unwrap();
        let acks = book.cancel_order(OrderId(1), 10, 3, Side::Sell);
        assert_eq!(acks, vec![CancelAck { id: OrderId(1), amount_canceled: 5 }]);
        assert_eq!(book.ask_interest(), 3);
    }

    #[test]
    fn cancel_absent_order_acknowledges_zero() {
        let mut book = book();
        let acks = book.cancel_order(OrderId(9), 10, 0, Side::Buy);
        assert_eq!(acks, vec![CancelAck { id: OrderId(9), amount_canceled: 0 }]);

        book.enter_buy(OrderId(1), 10, 5).unwrap();
        let acks = book.cancel_order(OrderId(9), 10, 0, Side::Buy);
        assert_eq!(acks, vec![CancelAck { id: OrderId(9), amount_canceled: 0 }]);
        assert_eq!(book.bid_interest(), 5);
    }

    #[test]
    fn non_downward_reduction_acknowledges_zero() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        // Requesting >= the current remainder leaves the order untouched.
        for requested in [5, 6] {
            let acks = book.cancel_order(OrderId(1), 10, requested, Side::Buy);
            assert_eq!(acks, vec![CancelAck { id: OrderId(1), amount_canceled: 0 }]);
        }
        assert_eq!(book.bid_interest(), 5);
    }

    #[test]
    fn time_priority_across_the_auction() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        book.enter_sell(OrderId(2), 10, 100).unwrap();
        book.enter_sell(OrderId(3), 10, 1).unwrap();

        // Only 5 shares trade; the older, larger ask fills first.
        let outcome = book.run_batch_auction();
        assert_eq!(trade_tuples(&outcome), vec![(1, 2, 10, 5)]);
        assert_eq!(book.ask_interest(), 96);
    }

    #[test]
    fn no_crossing_survives_the_auction() {
        let mut book = book();
        book.enter_buy(OrderId(1), 12, 10).unwrap();
        book.enter_buy(OrderId(2), 10, 4).unwrap();
        book.enter_sell(OrderId(3), 8, 4).unwrap();
        book.enter_sell(OrderId(4), 9, 4).unwrap();
        book.enter_sell(OrderId(5), 13, 2).unwrap();

        let outcome = book.run_batch_auction();
        let clearing = outcome.clearing_price.unwrap();
        let ask_ok = book.best_ask().is_none_or(|ask| ask > clearing);
        let bid_ok = book.best_bid().is_none_or(|bid| bid < clearing);
        assert!(
            ask_ok || bid_ok,
            "book still crossed at {clearing}: {:?} / {:?}",
            book.best_bid(),
            book.best_ask()
        );
    }

    #[test]
    fn bid_and_ask_fill_volumes_balance() {
        let mut book = book();
        book.enter_buy(OrderId(1), 12, 7).unwrap();
        book.enter_buy(OrderId(2), 11, 3).unwrap();
        book.enter_sell(OrderId(3), 9, 4).unwrap();
        book.enter_sell(OrderId(4), 10, 5).unwrap();

        let bid_before = book.bid_interest();
        let ask_before = book.ask_interest();
        let outcome = book.run_batch_auction();
        let executed = outcome.executed_volume();

        assert_eq!(bid_before - book.bid_interest(), executed);
        assert_eq!(ask_before - book.ask_interest(), executed);
    }

    #[test]
    fn outcome_trade_root_verifies() {
        let mut book = book();
        book.enter_buy(OrderId(1), 10, 5).unwrap();
        book.enter_sell(OrderId(2), 10, 5).unwrap();
        let outcome = book.run_batch_auction();
        assert!(crate::determinism::verify_trade_root(
            &outcome.trades,
            &outcome.trade_root
        ));
        assert_ne!(outcome.trade_root, compute_trade_root(&[]));
    }
}
