//! Event Ledger Access
//!
//! The remote actor that owns every event record, and the connectors that
//! produce handles to it.
//!
//! ## Architecture
//!
//! - **EventLedger**: the five-method actor surface
//! - **Connector**: builds anonymous handles for reads and identity-bound
//!   handles for writes
//! - **wire**: the JSON gateway envelope shared by every transport
//! - **MemoryConnector**: in-process actor over [`LedgerStore`]
//! - **HttpConnector**: reqwest transport for native builds

mod memory;
pub mod wire;

#[cfg(not(target_arch = "wasm32"))]
mod http;

pub use memory::{LedgerStore, MemoryConnector, MemoryLedger};

#[cfg(not(target_arch = "wasm32"))]
pub use http::{HttpConnector, HttpLedger};

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Identity;
use crate::types::{Event, EventId, EventPayload, EventSummary};

/// Errors that can occur when talking to the ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(String),

    /// The actor rejected the call
    #[error("{message}")]
    Rejected { code: u32, message: String },

    #[error("Invalid reply: {0}")]
    Decode(String),
}

impl LedgerError {
    pub fn rejected(code: u32, message: impl Into<String>) -> Self {
        LedgerError::Rejected {
            code,
            message: message.into(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// The remote event actor
///
/// Futures are single-threaded (`?Send`): every call is made from the UI
/// thread and settles there.
#[async_trait(?Send)]
pub trait EventLedger {
    /// Every event, in server order
    async fn get_events(&self) -> LedgerResult<Vec<EventSummary>>;

    async fn get_event_detail(&self, id: EventId) -> LedgerResult<Event>;

    /// Returns the id the ledger assigned
    async fn create_event(&self, payload: &EventPayload) -> LedgerResult<EventId>;

    async fn attend_event(&self, id: EventId) -> LedgerResult<()>;

    async fn complete_event(&self, id: EventId) -> LedgerResult<()>;
}

/// Factory for ledger handles
#[async_trait(?Send)]
pub trait Connector {
    type Ledger: EventLedger;

    /// Handle for anonymous reads
    fn anonymous(&self) -> Self::Ledger;

    /// Short-lived handle whose writes are made as `identity`
    async fn authenticated(&self, identity: &Identity) -> LedgerResult<Self::Ledger>;
}
