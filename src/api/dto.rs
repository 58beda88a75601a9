//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                  | Key Methods       |
// |------------------------|----------------------------------------------|-------------------|
// | SubmitOrderRequest     | Wire payload for submit_order                 | -                 |
// | CancelOrderRequest     | Wire payload for cancel_order                 | -                 |
// | OrderView              | An order as reported to a collaborator        | from_order        |
// | TradePartyView         | One counterparty's side of a TradeView        | from_party        |
// | TradeView              | A single fill as reported to a collaborator   | from_trade        |
// | DepthLevelView         | One (price, quantity) pair in a depth view    | -                 |
// | OrderbookView          | Full depth snapshot for one symbol            | from_snapshot     |
// | LockedFundsView        | Response to check_available_funds             | -                 |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::domain::models::{Order, Side, Trade, TradeParty};
use crate::domain::services::orderbook::depth::{DepthSnapshot, PriceLevel};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    pub base_asset: String,
    pub quote_asset: String,
    pub account: String,
    pub side: String,
    pub price: String,
    pub quantity: String,
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: String,
    pub order_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOrderQuery {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedFundsQuery {
    pub account: String,
    pub asset: String,
}

/// One counterparty's side of a `TradeView` (spec 6). The maker (party1) carries `order_id` and
/// `remaining_quantity`; the taker (party2) carries neither, since it is never resting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePartyView {
    pub account: String,
    pub side: Side,
    pub order_id: Option<u64>,
    pub remaining_quantity: Option<String>,
    pub private_key: Option<String>,
}

impl TradePartyView {
    fn from_party(party: &TradeParty) -> Self {
        TradePartyView {
            account: party.account.clone(),
            side: party.side,
            order_id: party.order_id,
            remaining_quantity: party.remaining_quantity.map(|q| q.to_string()),
            private_key: party.private_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeView {
    pub timestamp: i64,
    pub price: String,
    pub quantity: String,
    pub time: u64,
    pub party1: TradePartyView,
    pub party2: TradePartyView,
}

impl TradeView {
    pub fn from_trade(trade: &Trade) -> Self {
        TradeView {
            timestamp: trade.timestamp,
            price: trade.price.to_string(),
            quantity: trade.quantity.to_string(),
            time: trade.time,
            party1: TradePartyView::from_party(&trade.party1),
            party2: TradePartyView::from_party(&trade.party2),
        }
    }
}

/// An order as reported to a collaborator (spec 6). `is_valid` is false only for the
/// cancel/get-best sentinel cases described below.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: u64,
    pub account: String,
    pub price: String,
    pub quantity: String,
    pub side: Side,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(rename = "trade_id")]
    pub trade_id: String,
    pub timestamp: i64,
    pub trades: Vec<TradeView>,
    pub is_valid: bool,
}

impl OrderView {
    pub fn from_order(order: &Order, trades: Vec<TradeView>) -> Self {
        OrderView {
            order_id: order.order_id,
            account: order.account.clone(),
            price: order.price.to_string(),
            quantity: order.quantity.to_string(),
            side: order.side,
            base_asset: order.base_asset.clone(),
            quote_asset: order.quote_asset.clone(),
            trade_id: order.trade_id.clone(),
            timestamp: order.timestamp,
            trades,
            is_valid: true,
        }
    }

    /// The cancelled order's state at the moment of removal (spec 4.4.4): still `isValid`,
    /// since it reflects what the order *was*, not a placeholder.
    pub fn from_cancelled(order: &Order) -> Self {
        Self::from_order(order, Vec::new())
    }

    /// Sentinel returned by `get_best_order` when the queried side is empty (spec 6).
    pub fn sentinel(base_asset: &str, quote_asset: &str, side: Side) -> Self {
        OrderView {
            order_id: 0,
            account: String::new(),
            price: "0.00000000".to_string(),
            quantity: "0.00000000".to_string(),
            side,
            base_asset: base_asset.to_string(),
            quote_asset: quote_asset.to_string(),
            trade_id: String::new(),
            timestamp: 0,
            trades: Vec::new(),
            is_valid: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub order: OrderView,
    pub next_best: Option<OrderView>,
    pub task_id: u8,
    pub trades: Vec<TradeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepthLevelView {
    pub price: String,
    pub quantity: String,
}

impl From<PriceLevel> for DepthLevelView {
    fn from(level: PriceLevel) -> Self {
        DepthLevelView {
            price: level.price.to_string(),
            quantity: level.quantity.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderbookView {
    pub symbol: String,
    pub bids: Vec<DepthLevelView>,
    pub asks: Vec<DepthLevelView>,
}

impl From<DepthSnapshot> for OrderbookView {
    fn from(snapshot: DepthSnapshot) -> Self {
        OrderbookView {
            symbol: snapshot.symbol,
            bids: snapshot.bids.into_iter().map(DepthLevelView::from).collect(),
            asks: snapshot.asks.into_iter().map(DepthLevelView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedFundsResponse {
    pub locked_amount: String,
}
