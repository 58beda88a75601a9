use thiserror::Error;

use crate::domain::services::orderbook::OrderbookError;

pub mod matching_engine;

pub use self::matching_engine::MatchingEngine;

/// Errors surfaced across the symbol registry and the locked-funds aggregator.
///
/// `OrderbookError`s raised inside one book's pipeline are wrapped unchanged rather than
/// flattened, so a caller can still match on the originating condition (spec 7).
#[derive(Debug, Error)]
pub enum MatchingError {
    /// No book exists for this symbol yet, and the operation requires an existing one.
    #[error("no orderbook registered for symbol {0}")]
    UnknownSymbol(String),

    /// Error raised by a single book's processing pipeline.
    #[error("orderbook error: {0}")]
    Orderbook(#[from] OrderbookError),
}
