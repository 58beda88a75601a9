//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The symbol registry: a concurrency-safe map from "BASE_QUOTE" to one `OrderBook`, created
// lazily on first reference (spec 5, 9). Every book is independently mutex-guarded so
// submissions to different symbols never block one another; the registry's own lock is only
// held long enough to look up or insert an `Arc<Mutex<OrderBook>>`. This module also hosts the
// locked-funds aggregator (spec 4.5), the only operation that reads across every book.
//
// | Component      | Description                                                | Key Methods   |
// |-----------------|-------------------------------------------------------------|--------------|
// | MatchingEngine  | Symbol -> OrderBook registry, lazily populated               | submit_order |
// |                 |                                                               | cancel_order |
// |                 |                                                               | locked_funds |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{error, info};

use crate::domain::models::{Decimal, Order, Side};
use crate::domain::services::orderbook::depth::DepthSnapshot;
use crate::domain::services::orderbook::orderbook::{NewOrderRequest, OrderBook, SubmitOutcome};
use crate::domain::services::orderbook::OrderbookError;

use super::MatchingError;

fn symbol_for(base_asset: &str, quote_asset: &str) -> String {
    format!("{base_asset}_{quote_asset}")
}

#[derive(Default)]
pub struct MatchingEngine {
    books: RwLock<HashMap<String, Arc<Mutex<OrderBook>>>>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        MatchingEngine {
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the book for `symbol`, instantiating an empty one on first reference. Takes the
    /// cheap read-lock fast path first; only falls through to a write lock (and `entry`'s own
    /// double-check) when the symbol hasn't been seen yet.
    fn book_or_create(&self, symbol: &str) -> Arc<Mutex<OrderBook>> {
        if let Some(book) = self.books.read().get(symbol) {
            return book.clone();
        }
        self.books
            .write()
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(OrderBook::new())))
            .clone()
    }

    fn existing_book(&self, symbol: &str) -> Option<Arc<Mutex<OrderBook>>> {
        self.books.read().get(symbol).cloned()
    }

    /// All currently-registered symbols, in no particular order.
    pub fn symbols(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }

    /// Validates and routes a new limit order to its symbol's book (spec 4.4.1, 6).
    ///
    /// `trade_id` is not part of the wire payload (spec 6's `submit_order` input); it is derived
    /// from `account`, matching the original engine's `register_order` (`original_source/main.py`:
    /// `"trade_id": payload_json["account"]`).
    #[allow(clippy::too_many_arguments)]
    pub fn submit_order(
        &self,
        base_asset: &str,
        quote_asset: &str,
        account: &str,
        side: &str,
        price: &str,
        quantity: &str,
        private_key: Option<String>,
    ) -> Result<SubmitOutcome, MatchingError> {
        info!(base_asset, quote_asset, account, side, price, quantity, "submitting order");

        let side: Side = side.parse().map_err(|e: crate::domain::models::types::TypeError| {
            let err = MatchingError::from(OrderbookError::InvalidSide(e.to_string()));
            error!(%err, "rejected order");
            err
        })?;
        let price: Decimal = price.parse().map_err(|_| {
            let err = MatchingError::from(OrderbookError::InvalidPrice(price.to_string()));
            error!(%err, "rejected order");
            err
        })?;
        let quantity: Decimal = quantity.parse().map_err(|_| {
            let err = MatchingError::from(OrderbookError::InvalidQuantity(quantity.to_string()));
            error!(%err, "rejected order");
            err
        })?;

        let symbol = symbol_for(base_asset, quote_asset);
        let book = self.book_or_create(&symbol);
        let mut book = book.lock();
        let outcome = book.submit(NewOrderRequest {
            account: account.to_string(),
            trade_id: account.to_string(),
            side,
            price,
            quantity,
            base_asset: base_asset.to_string(),
            quote_asset: quote_asset.to_string(),
            private_key,
        })?;

        info!(
            order_id = outcome.order.order_id,
            task_id = outcome.task_id.code(),
            trade_count = outcome.trades.len(),
            "order accepted"
        );
        for trade in &outcome.trades {
            info!(
                price = %trade.price,
                quantity = %trade.quantity,
                maker = %trade.party1.account,
                taker = %trade.party2.account,
                "trade executed"
            );
        }
        Ok(outcome)
    }

    /// Cancels a resting order. Unlike `submit_order`, this never creates a book: an unknown
    /// symbol is reported as such rather than silently producing an empty one to cancel from.
    pub fn cancel_order(
        &self,
        base_asset: &str,
        quote_asset: &str,
        side: Side,
        order_id: u64,
    ) -> Result<Order, MatchingError> {
        info!(base_asset, quote_asset, order_id, "cancelling order");

        let symbol = symbol_for(base_asset, quote_asset);
        let book = self.existing_book(&symbol).ok_or_else(|| {
            let err = MatchingError::UnknownSymbol(symbol.clone());
            error!(%err, "rejected cancel");
            err
        })?;
        let mut book = book.lock();
        let cancelled = book.cancel(side, order_id).map_err(|e| {
            let err = MatchingError::from(e);
            error!(%err, "rejected cancel");
            err
        })?;
        info!(order_id, "order cancelled");
        Ok(cancelled)
    }

    /// Searches every registered book for `order_id`, first hit in registry iteration order
    /// (spec 6, 9: the id space is not globally unique across symbols).
    pub fn get_order(&self, order_id: u64) -> Option<Order> {
        let books = self.books.read();
        for book in books.values() {
            let guard = book.lock();
            if let Some(order) = guard.get_order(order_id) {
                return Some(order.clone());
            }
        }
        None
    }

    pub fn get_orderbook(&self, base_asset: &str, quote_asset: &str) -> Result<DepthSnapshot, MatchingError> {
        let symbol = symbol_for(base_asset, quote_asset);
        let book = self
            .existing_book(&symbol)
            .ok_or_else(|| MatchingError::UnknownSymbol(symbol.clone()))?;
        Ok(book.lock().snapshot(&symbol))
    }

    /// The head order at the best price on `side`, or `None` when the side (or symbol) is empty;
    /// the API boundary turns `None` into the sentinel placeholder of spec 6.
    pub fn get_best_order(&self, base_asset: &str, quote_asset: &str, side: Side) -> Option<Order> {
        let symbol = symbol_for(base_asset, quote_asset);
        let book = self.existing_book(&symbol)?;
        let guard = book.lock();
        match side {
            Side::Bid => guard.best_bid().cloned(),
            Side::Ask => guard.best_ask().cloned(),
        }
    }

    /// Sums committed funds for `account` in `asset` across every registered book (spec 4.5).
    /// Account comparison is case-insensitive; asset comparison is not.
    pub fn locked_funds(&self, account: &str, asset: &str) -> Decimal {
        let books = self.books.read();
        let mut total = Decimal::ZERO;
        for book in books.values() {
            let guard = book.lock();
            for bid in guard.bids.orders() {
                if bid.quote_asset == asset && bid.account.eq_ignore_ascii_case(account) {
                    total += bid.price * bid.quantity;
                }
            }
            for ask in guard.asks.orders() {
                if ask.base_asset == asset && ask.account.eq_ignore_ascii_case(account) {
                    total += ask.quantity;
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskId;

    #[test]
    fn lazily_creates_a_book_per_symbol() {
        let engine = MatchingEngine::new();
        assert!(engine.symbols().is_empty());
        engine
            .submit_order("ETH", "USD", "alice", "ask", "100", "5", None)
            .unwrap();
        assert_eq!(engine.symbols(), vec!["ETH_USD".to_string()]);
    }

    #[test]
    fn cancel_on_unknown_symbol_is_reported_not_invented() {
        let engine = MatchingEngine::new();
        let err = engine.cancel_order("ETH", "USD", Side::Bid, 1).unwrap_err();
        assert!(matches!(err, MatchingError::UnknownSymbol(_)));
    }

    #[test]
    fn get_order_searches_every_book() {
        let engine = MatchingEngine::new();
        engine
            .submit_order("ETH", "USD", "alice", "ask", "100", "5", None)
            .unwrap();
        let outcome = engine
            .submit_order("BTC", "USD", "bob", "bid", "50000", "1", None)
            .unwrap();
        assert!(matches!(outcome.task_id, TaskId::RestedBest));
        let found = engine.get_order(outcome.order.order_id).unwrap();
        assert_eq!(found.account, "bob");
    }

    /// Scenario (f): locked funds sum across both sides, for one account, per asset.
    #[test]
    fn locked_funds_sums_bids_in_quote_and_asks_in_base() {
        let engine = MatchingEngine::new();
        engine
            .submit_order("ETH", "USD", "alpha", "bid", "10", "4", None)
            .unwrap();
        engine
            .submit_order("ETH", "USD", "alpha", "ask", "12", "7", None)
            .unwrap();

        assert_eq!(engine.locked_funds("alpha", "USD").to_string(), "40.00000000");
        assert_eq!(engine.locked_funds("alpha", "ETH").to_string(), "7.00000000");
    }

    #[test]
    fn locked_funds_account_lookup_is_case_insensitive() {
        let engine = MatchingEngine::new();
        engine
            .submit_order("ETH", "USD", "0xABC", "bid", "10", "4", None)
            .unwrap();
        assert_eq!(engine.locked_funds("0xabc", "USD").to_string(), "40.00000000");
    }

    #[test]
    fn trade_id_is_derived_from_account() {
        let engine = MatchingEngine::new();
        let outcome = engine
            .submit_order("ETH", "USD", "alice", "ask", "100", "5", None)
            .unwrap();
        assert_eq!(outcome.order.trade_id, "alice");
    }

    #[test]
    fn invalid_side_is_rejected_before_touching_any_book() {
        let engine = MatchingEngine::new();
        let err = engine
            .submit_order("ETH", "USD", "alice", "sideways", "100", "5", None)
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::Orderbook(OrderbookError::InvalidSide(_))
        ));
        assert!(engine.symbols().is_empty());
    }
}
