//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Core entities shared by every orderbook: the side of an order, the order itself, and the trade
// record produced when two orders cross. Prices and quantities are always `Decimal` - never a
// binary float - so the matching pipeline in `services::orderbook` stays exact.
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decimal::Decimal;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown side: {0}")]
    UnknownSide(String),
}

impl std::str::FromStr for Side {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bid" | "buy" => Ok(Side::Bid),
            "ask" | "sell" => Ok(Side::Ask),
            other => Err(TypeError::UnknownSide(other.to_string())),
        }
    }
}

/// A resting or just-matched limit order.
///
/// `order_id` is assigned once by the owning `OrderBook` and never reused. `prev`/`next` address
/// neighboring orders within the same `PriceLevel` by order id, so the level can unlink a filled
/// head in O(1) without an owned pointer graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: u64,
    pub account: String,
    pub trade_id: String,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub base_asset: String,
    pub quote_asset: String,
    pub timestamp: i64,
    pub private_key: Option<String>,
    pub(crate) prev: Option<u64>,
    pub(crate) next: Option<u64>,
}

impl Order {
    pub fn symbol(&self) -> String {
        format!("{}_{}", self.base_asset, self.quote_asset)
    }
}

/// One counterparty's view inside a `Trade`. The maker side carries its resting order id and
/// post-trade remaining quantity; the taker side carries neither, since the taker is never
/// resting at the instant the trade is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeParty {
    pub account: String,
    pub side: Side,
    pub order_id: Option<u64>,
    pub remaining_quantity: Option<Decimal>,
    pub private_key: Option<String>,
}

/// A single fill, priced at the resting (maker) order's price.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub timestamp: i64,
    pub price: Decimal,
    pub quantity: Decimal,
    pub time: u64,
    pub party1: TradeParty,
    pub party2: TradeParty,
}

/// Outcome classification for a successfully processed submission (spec section 4.4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// No cross; order did not become the new best price on its side.
    RestedNotBest = 1,
    /// No cross; order became the new best price on its side.
    RestedBest = 2,
    /// Crossed; opposite best level partially filled, incoming fully consumed.
    PartialFill = 3,
    /// Crossed; one or more opposite best levels fully consumed, opposite best advanced.
    FullSweep = 4,
}

impl TaskId {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("BID".parse::<Side>().unwrap(), Side::Bid);
        assert_eq!("ask".parse::<Side>().unwrap(), Side::Ask);
        assert!("neither".parse::<Side>().is_err());
    }

    #[test]
    fn side_opposite_round_trips() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite().opposite(), Side::Ask);
    }

    #[test]
    fn task_id_codes_match_spec_table() {
        assert_eq!(TaskId::RestedNotBest.code(), 1);
        assert_eq!(TaskId::RestedBest.code(), 2);
        assert_eq!(TaskId::PartialFill.code(), 3);
        assert_eq!(TaskId::FullSweep.code(), 4);
    }
}
