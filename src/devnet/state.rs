//! Devnet State
//!
//! Shared state for the replica handlers. Wrapped in Arc for sharing across
//! the tokio worker threads.

use std::sync::Arc;
use std::time::Instant;

use crate::config::DEFAULT_CANISTER_ID;
use crate::ledger::LedgerStore;

/// Shared state for all handlers
#[derive(Clone)]
pub struct DevnetState {
    /// The in-memory event actor
    pub store: Arc<LedgerStore>,
    pub config: Arc<DevnetConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl DevnetState {
    pub fn new(config: DevnetConfig) -> Self {
        Self::with_store(Arc::new(LedgerStore::new()), config)
    }

    /// Serve an existing store, e.g. one a test also inspects directly
    pub fn with_store(store: Arc<LedgerStore>, config: DevnetConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Replica server configuration
#[derive(Debug, Clone)]
pub struct DevnetConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// The only canister id the replica answers for
    pub canister_id: String,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4943,
            canister_id: DEFAULT_CANISTER_ID.to_string(),
        }
    }
}

impl DevnetConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
