//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A thin REST surface over the matching engine, exposing exactly the six operations of spec
// section 6 as JSON endpoints. This module carries no matching logic of its own: every handler
// parses its request, calls into `MatchingEngine`, and maps the result (or error) onto a
// response DTO.
//
// | Component | Description                                    | Key Methods |
// |-----------|--------------------------------------------------|-------------|
// | AppState  | Shared application state (the engine handle)      | new         |
// | Api       | Router + listen address                           | serve       |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::domain::services::matching_engine::MatchingEngine;

pub use error::{ApiError, ApiResult};

/// Shared application state accessible by every handler.
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
}

impl AppState {
    pub fn new(engine: Arc<MatchingEngine>) -> Self {
        Self { engine }
    }
}

/// The HTTP surface: a listen address plus the router built over one shared `AppState`.
pub struct Api {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl Api {
    pub fn new(addr: SocketAddr, engine: Arc<MatchingEngine>) -> Self {
        Self {
            addr,
            state: Arc::new(AppState::new(engine)),
        }
    }

    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
            ])
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/health", get(routes::health))
            .route("/orders", post(routes::submit_order))
            .route("/orders", delete(routes::cancel_order))
            .route("/orders/:order_id", get(routes::get_order))
            .route("/orderbook/:base_asset/:quote_asset", get(routes::get_orderbook))
            .route("/best-order", get(routes::get_best_order))
            .route("/locked-funds", get(routes::check_available_funds))
            .layer(Extension(self.state.clone()))
            .layer(cors)
    }

    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.routes();
        tracing::info!(addr = %self.addr, "API listening");
        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
