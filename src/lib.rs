pub mod api;
pub mod config;
pub mod domain;

pub use domain::models::{Decimal, Order, Side, TaskId, Trade, TradeParty, TypeError};
pub use domain::services::matching_engine::{MatchingEngine, MatchingError};
pub use domain::services::orderbook::depth::{DepthSnapshot, PriceLevel};
pub use domain::services::orderbook::orderbook::{NewOrderRequest, OrderBook, SubmitOutcome};
pub use domain::services::orderbook::OrderbookError;
