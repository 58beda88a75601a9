//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                      | Key Methods         |
// |-----------------|--------------------------------------------------|---------------------|
// | ApiError        | Error types for the API                          | from                |
//--------------------------------------------------------------------------------------------------

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::services::matching_engine::MatchingError;
use crate::domain::services::orderbook::OrderbookError;

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// API-specific error types, matched onto HTTP status codes the way the reference crate's
/// `api::error` module matches its own error enum (spec 7).
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The requested resource was not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The request was invalid
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An internal orderbook invariant was violated
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

impl From<MatchingError> for ApiError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::UnknownSymbol(symbol) => Self::NotFound(format!("symbol {symbol} not found")),
            MatchingError::Orderbook(inner) => Self::from(inner),
        }
    }
}

impl From<OrderbookError> for ApiError {
    fn from(err: OrderbookError) -> Self {
        match err {
            OrderbookError::InvalidQuantity(msg) => Self::BadRequest(format!("invalid quantity: {msg}")),
            OrderbookError::InvalidPrice(msg) => Self::BadRequest(format!("invalid price: {msg}")),
            OrderbookError::InvalidSide(msg) => Self::BadRequest(format!("invalid side: {msg}")),
            OrderbookError::OrderNotFound(id) => Self::NotFound(format!("order {id} not found")),
            OrderbookError::Internal(msg) => Self::Internal(msg),
        }
    }
} 