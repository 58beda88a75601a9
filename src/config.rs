use std::env;

use dotenv::dotenv;

const LISTEN_ADDR: &str = "LISTEN_ADDR";
const RUST_LOG: &str = "RUST_LOG";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_RUST_LOG: &str = "info";

/// Startup configuration for the `api_server` binary (spec 6): the only environment-derived
/// state the core ever needs is where to listen and how verbosely to log.
#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Config {
        dotenv().ok();

        let listen_addr = env::var(LISTEN_ADDR).unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let rust_log = env::var(RUST_LOG).unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string());

        Config {
            listen_addr,
            rust_log,
        }
    }
}
