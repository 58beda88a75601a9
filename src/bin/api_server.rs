//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Entry point for the matching engine's HTTP surface: loads configuration, initializes logging,
// and serves the six operations of spec section 6 until the process is killed.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use clob_engine::api::Api;
use clob_engine::MatchingEngine;
use clob_engine::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("starting matching engine API server");

    let addr: SocketAddr = config.listen_addr.parse().expect("invalid LISTEN_ADDR");
    let engine = Arc::new(MatchingEngine::new());

    let api = Api::new(addr, engine);
    api.serve().await?;

    Ok(())
}
