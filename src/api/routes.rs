//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                             | Return Type         |
// |------------------------|-----------------------------------------|---------------------|
// | health                | Health check endpoint                   | Response            |
// | submit_order          | Submit a new limit order                | ApiResult<Response> |
// | cancel_order          | Cancel a resting order                  | ApiResult<Response> |
// | get_order             | Look up an order by id, across books    | ApiResult<Response> |
// | get_orderbook         | Depth snapshot for one symbol           | ApiResult<Response> |
// | get_best_order        | Head order at the best price on a side  | ApiResult<Response> |
// | check_available_funds | Locked funds for an account/asset       | ApiResult<Response> |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    BestOrderQuery, CancelOrderRequest, LockedFundsQuery, LockedFundsResponse, OrderView,
    OrderbookView, SubmitOrderRequest, SubmitOrderResponse, TradeView,
};
use super::{ApiError, ApiResult, AppState};
use crate::domain::models::Side;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `submit_order` (spec 6): validates and routes a new limit order, returning the resulting
/// order view alongside every trade it produced.
pub async fn submit_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<SubmitOrderRequest>,
) -> ApiResult<Response> {
    let outcome = state.engine.submit_order(
        &req.base_asset,
        &req.quote_asset,
        &req.account,
        &req.side,
        &req.price,
        &req.quantity,
        req.private_key,
    )?;

    let trades: Vec<TradeView> = outcome.trades.iter().map(TradeView::from_trade).collect();
    let response = SubmitOrderResponse {
        order: OrderView::from_order(&outcome.order, trades.clone()),
        next_best: outcome.next_best.as_ref().map(|o| OrderView::from_order(o, Vec::new())),
        task_id: outcome.task_id.code(),
        trades,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// `cancel_order` (spec 6): returns the removed order's snapshot from the moment of removal.
pub async fn cancel_order(
    Extension(state): Extension<Arc<AppState>>,
    Query(req): Query<CancelOrderRequest>,
) -> ApiResult<Response> {
    let side: Side = req
        .side
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid side: {}", req.side)))?;
    let order = state
        .engine
        .cancel_order(&req.base_asset, &req.quote_asset, side, req.order_id)?;

    Ok((StatusCode::OK, Json(OrderView::from_cancelled(&order))).into_response())
}

/// `get_order` (spec 6): searches every registered book, first hit wins.
pub async fn get_order(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<u64>,
) -> ApiResult<Response> {
    let order = state
        .engine
        .get_order(order_id)
        .ok_or_else(|| ApiError::NotFound(format!("order {order_id} not found")))?;

    Ok((StatusCode::OK, Json(OrderView::from_order(&order, Vec::new()))).into_response())
}

/// `get_orderbook` (spec 6): a two-sided depth snapshot, bids descending and asks ascending.
pub async fn get_orderbook(
    Extension(state): Extension<Arc<AppState>>,
    Path((base_asset, quote_asset)): Path<(String, String)>,
) -> ApiResult<Response> {
    let snapshot = state.engine.get_orderbook(&base_asset, &quote_asset)?;
    Ok((StatusCode::OK, Json(OrderbookView::from(snapshot))).into_response())
}

/// `get_best_order` (spec 6): the head order at the best price, or a sentinel when empty.
pub async fn get_best_order(
    Extension(state): Extension<Arc<AppState>>,
    Query(req): Query<BestOrderQuery>,
) -> ApiResult<Response> {
    let side: Side = req
        .side
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid side: {}", req.side)))?;
    let view = match state.engine.get_best_order(&req.base_asset, &req.quote_asset, side) {
        Some(order) => OrderView::from_order(&order, Vec::new()),
        None => OrderView::sentinel(&req.base_asset, &req.quote_asset, side),
    };
    Ok((StatusCode::OK, Json(view)).into_response())
}

/// `check_available_funds` (spec 4.5, 6): committed funds for an account in one asset, summed
/// across every registered book.
pub async fn check_available_funds(
    Extension(state): Extension<Arc<AppState>>,
    Query(req): Query<LockedFundsQuery>,
) -> ApiResult<Response> {
    let locked = state.engine.locked_funds(&req.account, &req.asset);
    let response = LockedFundsResponse {
        locked_amount: locked.to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}
