//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The per-symbol order book: price levels, the side indexes built on top of them, the matching
// pipeline that turns a submission into trades, and the depth snapshot used for reporting.
//--------------------------------------------------------------------------------------------------

use thiserror::Error;

pub mod depth;
pub mod orderbook;
pub mod price_level;
pub mod side_book;

/// Errors that can occur within a single order book's processing pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderbookError {
    /// `quantity` was not a positive value.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// `price` was not a positive value.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// `side` was neither "bid" nor "ask".
    #[error("invalid side: {0}")]
    InvalidSide(String),

    /// The order id was not found on the side it was expected to rest on.
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// An internal invariant was violated (e.g. an order_map entry with no matching price
    /// level membership). Fatal for the affected book; callers should not retry.
    #[error("internal orderbook invariant violated: {0}")]
    Internal(String),
}
