//! End-to-end auction cycles over a live book.
//!
//! Exercises the full entry → cancel → auction flow the way the transport
//! layer drives it, plus randomized volume-conservation sweeps.

use callmatch_book::{MatchingSession, OrderBook, verify_trade_root};
use callmatch_types::{BatchConfig, Instruction, OrderId, SessionEvent, Side, Symbol, Volume};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn book() -> OrderBook {
    OrderBook::new(Symbol::new("XYZ"))
}

/// Every level's cached interest must equal the sum of its resting orders.
fn assert_interest_consistent(book: &OrderBook) {
    for ladder in [book.bids(), book.asks()] {
        for level in ladder.iter() {
            let summed: Volume = level.iter().map(|(_, v)| v).sum();
            assert_eq!(
                level.interest(),
                summed,
                "interest drifted at price {}",
                level.price
            );
            assert!(level.interest() > 0, "empty level survived at {}", level.price);
        }
    }
}

#[test]
fn single_match_empties_the_book() {
    let mut book = book();
    book.enter_buy(OrderId(1), 10, 5).unwrap();
    book.enter_sell(OrderId(2), 10, 5).unwrap();

    let outcome = book.run_batch_auction();
    assert_eq!(outcome.clearing_price, Some(10));
    assert_eq!(outcome.trades.len(), 1);
    let trade = &outcome.trades[0];
    assert_eq!(
        (trade.buy_order_id, trade.sell_order_id, trade.price, trade.volume),
        (OrderId(1), OrderId(2), 10, 5)
    );
    assert!(book.is_empty());
}

#[test]
fn partial_bid_rests_after_deep_sweep() {
    let mut book = book();
    book.enter_buy(OrderId(1), 12, 10).unwrap();
    book.enter_sell(OrderId(2), 8, 4).unwrap();
    book.enter_sell(OrderId(3), 9, 4).unwrap();

    let outcome = book.run_batch_auction();
    assert_eq!(outcome.clearing_price, Some(9));
    assert_eq!(outcome.executed_volume(), 8);
    assert!(outcome.trades.iter().all(|t| t.price == 9));
    assert_eq!(book.bid_interest(), 2);
    assert_eq!(book.best_bid(), Some(12));
    assert_eq!(book.ask_depth(), 0);
    assert_interest_consistent(&book);
}

#[test]
fn cancel_then_reenter_recreates_the_level() {
    let mut book = book();
    book.enter_buy(OrderId(1), 10, 5).unwrap();
    let acks = book.cancel_order(OrderId(1), 10, 0, Side::Buy);
    assert_eq!(acks[0].amount_canceled, 5);
    assert_eq!(book.bid_depth(), 0);

    book.enter_buy(OrderId(2), 10, 7).unwrap();
    assert_eq!(book.bid_depth(), 1);
    assert_eq!(book.bid_interest(), 7);
    assert_interest_consistent(&book);
}

#[test]
fn invalid_reduction_is_a_zero_effect_ack() {
    let mut book = book();
    book.enter_sell(OrderId(1), 10, 5).unwrap();
    let acks = book.cancel_order(OrderId(1), 10, 5, Side::Sell);
    assert_eq!(acks[0].amount_canceled, 0);
    assert_eq!(book.ask_interest(), 5);
}

#[test]
fn repeated_cycles_stay_consistent() {
    let mut session = MatchingSession::new(Symbol::new("XYZ"), BatchConfig::default());
    let mut next_id = 0_u64;
    for cycle in 0..5 {
        for i in 0..4 {
            next_id += 1;
            session.apply(Instruction::Enter {
                id: OrderId(next_id),
                side: Side::Buy,
                price: 10 + cycle + i,
                volume: 2 + i,
            });
            next_id += 1;
            session.apply(Instruction::Enter {
                id: OrderId(next_id),
                side: Side::Sell,
                price: 9 + cycle + i,
                volume: 1 + i,
            });
        }
        let event = session.apply(Instruction::AuctionTick);
        let SessionEvent::AuctionComplete(outcome) = event else {
            panic!("auction tick must complete an auction");
        };
        assert!(verify_trade_root(&outcome.trades, &outcome.trade_root));
        if let Some(clearing) = outcome.clearing_price {
            let ask_clear = session.book().best_ask().is_none_or(|ask| ask > clearing);
            let bid_clear = session.book().best_bid().is_none_or(|bid| bid < clearing);
            assert!(
                ask_clear || bid_clear,
                "crossing interest survived cycle {cycle} at {clearing}"
            );
        }
        assert_interest_consistent(session.book());
    }
}

#[test]
fn randomized_flow_conserves_volume() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut book = book();
    let mut next_id = 0_u64;

    for _round in 0..50 {
        // A burst of random entries...
        for _ in 0..rng.gen_range(1..=12) {
            next_id += 1;
            let price = rng.gen_range(90..=110);
            let volume = rng.gen_range(1..=20);
            if rng.gen_bool(0.5) {
                book.enter_buy(OrderId(next_id), price, volume).unwrap();
            } else {
                book.enter_sell(OrderId(next_id), price, volume).unwrap();
            }
        }
        assert_interest_consistent(&book);

        // ...then an auction tick.
        let bid_before = book.bid_interest();
        let ask_before = book.ask_interest();
        let outcome = book.run_batch_auction();
        let executed = outcome.executed_volume();

        assert_eq!(
            bid_before - book.bid_interest(),
            executed,
            "bid-side fills diverged from executed volume"
        );
        assert_eq!(
            ask_before - book.ask_interest(),
            executed,
            "ask-side fills diverged from executed volume"
        );
        if let Some(clearing) = outcome.clearing_price {
            assert!(outcome.trades.iter().all(|t| t.price == clearing));
            // No ask at or below the clearing price may coexist with a bid
            // at or above it once the auction completes.
            let ask_crossing = book.best_ask().is_some_and(|a| a <= clearing);
            let bid_crossing = book.best_bid().is_some_and(|b| b >= clearing);
            assert!(
                !(ask_crossing && bid_crossing),
                "crossing interest survived the auction at {clearing}"
            );
        } else {
            assert!(outcome.trades.is_empty());
        }
        assert_interest_consistent(&book);
    }
}

#[test]
fn identical_books_produce_identical_outcomes() {
    let build = || {
        let mut book = book();
        book.enter_buy(OrderId(1), 12, 7).unwrap();
        book.enter_buy(OrderId(2), 11, 3).unwrap();
        book.enter_sell(OrderId(3), 9, 4).unwrap();
        book.enter_sell(OrderId(4), 10, 5).unwrap();
        book
    };

    let outcome_a = build().run_batch_auction();
    let outcome_b = build().run_batch_auction();

    assert_eq!(outcome_a.clearing_price, outcome_b.clearing_price);
    assert_eq!(outcome_a.trade_root, outcome_b.trade_root);
    assert_eq!(outcome_a.trades.len(), outcome_b.trades.len());
    for (a, b) in outcome_a.trades.iter().zip(outcome_b.trades.iter()) {
        assert_eq!(a.id, b.id, "trade ids must be reproducible");
        assert_eq!(a.volume, b.volume);
    }
}
