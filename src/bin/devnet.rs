//! ChronoX Development Replica
//!
//! Run with: cargo run --bin chronox-devnet
//!
//! # Configuration
//!
//! Environment variables:
//! - `CHRONOX_DEVNET_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CHRONOX_DEVNET_PORT`: Port to listen on (default: 4943)
//! - `CANISTER_ID_CHRONOX_BACKEND`: Canister id to answer for
//! - `CHRONOX_LOG_LEVEL` / `CHRONOX_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter override

use chronox::config::Config;
use chronox::devnet::{serve, DevnetConfig, DevnetState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    chronox::logging::init(&config.logging, &["tower_http=debug"]);

    tracing::info!("Starting ChronoX devnet v{}", env!("CARGO_PKG_VERSION"));

    let devnet_config = load_devnet_config(&config);
    let state = DevnetState::new(devnet_config.clone());

    serve(state, &devnet_config).await?;

    tracing::info!("ChronoX devnet stopped");
    Ok(())
}

/// Load replica configuration from environment
fn load_devnet_config(config: &Config) -> DevnetConfig {
    let host = std::env::var("CHRONOX_DEVNET_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = std::env::var("CHRONOX_DEVNET_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(4943);

    DevnetConfig {
        host,
        port,
        canister_id: config.network.canister_id.clone(),
    }
}
