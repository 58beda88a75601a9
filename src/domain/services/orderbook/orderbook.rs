//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The order book for one (base, quote) symbol: two `SideBook`s, a monotonic order-id counter,
// a monotonic logical clock, and the append-only trade tape. `submit` is the whole matching
// pipeline - validation, crossing, trade emission, residual placement and outcome
// classification - run as one atomic step from the caller's perspective (spec 4.4, 5).
//
// | Component  | Description                                             | Key Methods       |
// |------------|-----------------------------------------------------------|-------------------|
// | OrderBook  | bids/asks + id counter + tick + tape for one symbol        | submit            |
// |            |                                                             | cancel            |
// |            |                                                             | snapshot          |
//--------------------------------------------------------------------------------------------------

use chrono::Utc;

use crate::domain::models::{Decimal, Order, Side, TaskId, Trade, TradeParty};

use super::depth;
use super::depth::DepthSnapshot;
use super::side_book::SideBook;
use super::OrderbookError;

/// A validated limit order ready to enter the pipeline. Price, quantity and side have already
/// been parsed from their wire representation by the caller (spec 4.4.1's parse step); `submit`
/// only checks the remaining business rules (positivity).
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub account: String,
    pub trade_id: String,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub base_asset: String,
    pub quote_asset: String,
    pub private_key: Option<String>,
}

/// Everything a caller needs to report back to the client after a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The incoming order's final state: resting (if residual > 0) or fully consumed
    /// (quantity = 0, never inserted).
    pub order: Order,
    /// The head order of the opposite side's new best level. Only ever `Some` for task 4.
    pub next_best: Option<Order>,
    pub task_id: TaskId,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone)]
pub struct OrderBook {
    pub bids: SideBook,
    pub asks: SideBook,
    next_order_id: u64,
    tape: Vec<Trade>,
    time: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        OrderBook {
            bids: SideBook::new(Side::Bid),
            asks: SideBook::new(Side::Ask),
            next_order_id: 1,
            tape: Vec::new(),
            time: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.time
    }

    pub fn tape(&self) -> &[Trade] {
        &self.tape
    }

    fn wall_time_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn crosses(side: Side, price: Decimal, opposite_best: Decimal) -> bool {
        match side {
            Side::Bid => price >= opposite_best,
            Side::Ask => price <= opposite_best,
        }
    }

    /// Runs one order through the full pipeline: tick advance, id assignment, crossing against
    /// the opposite side, residual placement, and outcome classification (spec 4.4).
    pub fn submit(&mut self, req: NewOrderRequest) -> Result<SubmitOutcome, OrderbookError> {
        if !req.quantity.is_positive() {
            return Err(OrderbookError::InvalidQuantity(req.quantity.to_string()));
        }
        if !req.price.is_positive() {
            return Err(OrderbookError::InvalidPrice(req.price.to_string()));
        }

        self.time += 1;
        let order_id = self.next_order_id;
        self.next_order_id += 1;

        let mut incoming = Order {
            order_id,
            account: req.account,
            trade_id: req.trade_id,
            side: req.side,
            price: req.price,
            quantity: req.quantity,
            base_asset: req.base_asset,
            quote_asset: req.quote_asset,
            timestamp: Self::wall_time_ms(),
            private_key: req.private_key,
            prev: None,
            next: None,
        };

        let (own, opposite) = match incoming.side {
            Side::Bid => (&mut self.bids, &mut self.asks),
            Side::Ask => (&mut self.asks, &mut self.bids),
        };
        let original_opposite_best = opposite.best_price();
        let mut residual = incoming.quantity;
        let mut trades = Vec::new();

        loop {
            if residual.is_zero() {
                break;
            }
            let Some(best_price) = opposite.best_price() else {
                break;
            };
            if !Self::crosses(incoming.side, incoming.price, best_price) {
                break;
            }
            loop {
                if residual.is_zero() {
                    break;
                }
                let Some(head_id) = opposite.price_list(best_price).and_then(|l| l.head()) else {
                    break;
                };
                let head = opposite
                    .get_order(head_id)
                    .cloned()
                    .ok_or_else(|| OrderbookError::Internal(format!(
                        "order {head_id} indexed as level head but missing from order_map"
                    )))?;

                let traded_qty = residual.min(head.quantity);
                let remaining_after = head.quantity - traded_qty;

                trades.push(Trade {
                    timestamp: Self::wall_time_ms(),
                    price: head.price,
                    quantity: traded_qty,
                    time: self.time,
                    party1: TradeParty {
                        account: head.account.clone(),
                        side: head.side,
                        order_id: Some(head.order_id),
                        remaining_quantity: Some(remaining_after),
                        private_key: head.private_key.clone(),
                    },
                    party2: TradeParty {
                        account: incoming.account.clone(),
                        side: incoming.side,
                        order_id: None,
                        remaining_quantity: None,
                        private_key: incoming.private_key.clone(),
                    },
                });

                residual -= traded_qty;
                if traded_qty == head.quantity {
                    opposite.remove_order_by_id(head_id);
                } else {
                    opposite.reduce_quantity(head_id, traded_qty);
                }
            }
        }

        self.tape.extend(trades.iter().cloned());

        if residual.is_zero() {
            let task_id = if opposite.best_price() == original_opposite_best {
                TaskId::PartialFill
            } else {
                TaskId::FullSweep
            };
            let next_best = match task_id {
                TaskId::FullSweep => opposite.best_order().cloned(),
                _ => None,
            };
            incoming.quantity = Decimal::ZERO;
            Ok(SubmitOutcome {
                order: incoming,
                next_best,
                task_id,
                trades,
            })
        } else {
            incoming.quantity = residual;
            let inserted = incoming.clone();
            own.insert_order(incoming);
            let task_id = if own.best_price() == Some(inserted.price) {
                TaskId::RestedBest
            } else {
                TaskId::RestedNotBest
            };
            Ok(SubmitOutcome {
                order: inserted,
                next_best: None,
                task_id,
                trades,
            })
        }
    }

    /// Removes a resting order by id, returning the snapshot captured the instant before it was
    /// unlinked. Never touches the opposite side (spec 4.4.4).
    pub fn cancel(&mut self, side: Side, order_id: u64) -> Result<Order, OrderbookError> {
        let book = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        book.remove_order_by_id(order_id)
            .ok_or(OrderbookError::OrderNotFound(order_id))
    }

    /// Looks up a resting order on either side, without regard to which side it rests on.
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        self.bids
            .get_order(order_id)
            .or_else(|| self.asks.get_order(order_id))
    }

    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.best_order()
    }

    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.best_order()
    }

    pub fn snapshot(&self, symbol: &str) -> DepthSnapshot {
        DepthSnapshot {
            symbol: symbol.to_string(),
            bids: depth::bids_snapshot(&self.bids),
            asks: depth::asks_snapshot(&self.asks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(side: Side, price: &str, qty: &str, account: &str) -> NewOrderRequest {
        NewOrderRequest {
            account: account.to_string(),
            trade_id: "t".into(),
            side,
            price: price.parse().unwrap(),
            quantity: qty.parse().unwrap(),
            base_asset: "ETH".into(),
            quote_asset: "USD".into(),
            private_key: Some("secret".into()),
        }
    }

    /// Scenario (a): empty book, submit ask -> rests, becomes new best ask.
    #[test]
    fn scenario_a_resting_ask_is_new_best() {
        let mut book = OrderBook::new();
        let outcome = book.submit(req(Side::Ask, "100", "5", "maker")).unwrap();
        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.task_id, TaskId::RestedBest);
        assert_eq!(outcome.order.quantity.to_string(), "5.00000000");
        assert!(book.bids.is_empty());
        assert_eq!(book.asks.best_price().unwrap().to_string(), "100.00000000");
    }

    /// Scenario (b): continue from (a), submit a non-crossing bid -> new best bid.
    #[test]
    fn scenario_b_resting_bid_is_new_best() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Ask, "100", "5", "maker")).unwrap();
        let outcome = book.submit(req(Side::Bid, "99", "3", "taker")).unwrap();
        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.task_id, TaskId::RestedBest);
        assert_eq!(book.bids.best_price().unwrap().to_string(), "99.00000000");
    }

    /// Scenario (c): crossing bid partially fills the resting ask; head stays in place.
    #[test]
    fn scenario_c_partial_fill_of_opposite_best() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Ask, "100", "5", "maker")).unwrap();
        book.submit(req(Side::Bid, "99", "3", "other")).unwrap();
        let outcome = book.submit(req(Side::Bid, "100", "2", "taker")).unwrap();

        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].price.to_string(), "100.00000000");
        assert_eq!(outcome.trades[0].quantity.to_string(), "2.00000000");
        assert_eq!(outcome.task_id, TaskId::PartialFill);
        assert!(outcome.next_best.is_none());
        assert_eq!(outcome.order.quantity.to_string(), "0.00000000");

        let resting_ask = book.asks.get_order(1).unwrap();
        assert_eq!(resting_ask.quantity.to_string(), "3.00000000");
    }

    /// Scenario (d): continue from (c), a bid that exactly drains the remaining ask.
    #[test]
    fn scenario_d_full_sweep_empties_opposite_side() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Ask, "100", "5", "maker")).unwrap();
        book.submit(req(Side::Bid, "99", "3", "other")).unwrap();
        book.submit(req(Side::Bid, "100", "2", "taker1")).unwrap();
        let outcome = book.submit(req(Side::Bid, "100", "3", "taker2")).unwrap();

        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].quantity.to_string(), "3.00000000");
        assert_eq!(outcome.task_id, TaskId::FullSweep);
        assert!(outcome.next_best.is_none());
        assert!(book.asks.is_empty());
    }

    /// Scenario (e): FIFO within a level - two asks at the same price, a sweeping bid consumes
    /// the first in full and the second partially.
    #[test]
    fn scenario_e_fifo_within_a_price_level() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Ask, "100", "2", "a1")).unwrap();
        book.submit(req(Side::Ask, "100", "2", "a2")).unwrap();
        let outcome = book.submit(req(Side::Bid, "100", "3", "taker")).unwrap();

        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.trades[0].party1.account, "a1");
        assert_eq!(outcome.trades[0].quantity.to_string(), "2.00000000");
        assert_eq!(outcome.trades[1].party1.account, "a2");
        assert_eq!(outcome.trades[1].quantity.to_string(), "1.00000000");
        assert_eq!(outcome.task_id, TaskId::PartialFill);

        let a2 = book.asks.get_order(2).unwrap();
        assert_eq!(a2.quantity.to_string(), "1.00000000");
    }

    #[test]
    fn sweeping_multiple_price_levels_is_permitted() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Ask, "100", "2", "a1")).unwrap();
        book.submit(req(Side::Ask, "101", "2", "a2")).unwrap();
        let outcome = book.submit(req(Side::Bid, "101", "4", "taker")).unwrap();

        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.task_id, TaskId::FullSweep);
        assert!(book.asks.is_empty());
    }

    #[test]
    fn order_ids_increase_strictly_within_a_book() {
        let mut book = OrderBook::new();
        let first = book.submit(req(Side::Ask, "100", "1", "a")).unwrap();
        let second = book.submit(req(Side::Ask, "101", "1", "b")).unwrap();
        assert!(second.order.order_id > first.order.order_id);
    }

    #[test]
    fn cancel_removes_exactly_the_requested_order() {
        let mut book = OrderBook::new();
        book.submit(req(Side::Bid, "100", "1", "a")).unwrap();
        let outcome = book.submit(req(Side::Bid, "100", "2", "b")).unwrap();
        let cancelled = book.cancel(Side::Bid, outcome.order.order_id).unwrap();
        assert_eq!(cancelled.quantity.to_string(), "2.00000000");
        assert_eq!(book.bids.num_orders(), 1);
        assert_eq!(book.bids.volume().to_string(), "1.00000000");
    }

    #[test]
    fn cancel_of_missing_order_is_not_found() {
        let mut book = OrderBook::new();
        let err = book.cancel(Side::Bid, 999).unwrap_err();
        assert_eq!(err, OrderbookError::OrderNotFound(999));
    }

    #[test]
    fn zero_quantity_is_rejected_without_mutating_the_book() {
        let mut book = OrderBook::new();
        let err = book.submit(req(Side::Bid, "100", "0", "a")).unwrap_err();
        assert_eq!(err, OrderbookError::InvalidQuantity("0.00000000".to_string()));
        assert!(book.bids.is_empty());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut book = OrderBook::new();
        let err = book.submit(req(Side::Bid, "-1", "1", "a")).unwrap_err();
        assert_eq!(err, OrderbookError::InvalidPrice("-1.00000000".to_string()));
    }

    #[test]
    fn round_trip_insert_then_cancel_all_leaves_empty_book() {
        let mut book = OrderBook::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let price = format!("{}", 90 + i);
            let outcome = book.submit(req(Side::Bid, &price, "1", "a")).unwrap();
            ids.push(outcome.order.order_id);
        }
        for id in ids.into_iter().rev() {
            book.cancel(Side::Bid, id).unwrap();
        }
        assert!(book.bids.is_empty());
        assert_eq!(book.bids.depth(), 0);
    }
}
