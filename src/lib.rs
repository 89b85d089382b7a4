//! # ChronoX
//!
//! Client for a decentralized event-management application: browse events,
//! sign in with a delegated identity, create events and register attendance.
//! Every durable record lives in a remote ledger-backed actor; this crate
//! owns the contract between UI state and that actor.
//!
//! ## Modules
//!
//! - [`types`]: Event records, summaries and creation payloads
//! - [`dates`]: Timestamp formatting and relative-time labels
//! - [`auth`]: Identity providers and the application session
//! - [`ledger`]: The actor surface, wire format and transports
//! - [`remote`]: Fetch state and authenticated action dispatch
//! - [`form`]: Create-event validation
//! - [`view`]: Filter and action-panel decisions
//! - [`config`]: Network and logging configuration
//! - `devnet`: Local development replica (native only)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chronox::auth::{DevIdentityConfig, DevIdentityProvider, Session};
//! use chronox::config::Config;
//! use chronox::ledger::HttpConnector;
//! use chronox::remote::{EventActions, EventsQuery};
//! use chronox::types::EventPayload;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let connector = HttpConnector::new(config.network)?;
//!
//!     // Anonymous read of every event
//!     let mut events = EventsQuery::new();
//!     events.fetch(&connector).await;
//!     println!("Found {} events", events.events().len());
//!
//!     // Sign in, then write
//!     let mut session = Session::new();
//!     session.login(&DevIdentityProvider::new(DevIdentityConfig::default())).await;
//!
//!     let mut actions = EventActions::new();
//!     let payload = EventPayload::new("Rust meetup", "Library", 1_900_000_000_000);
//!     let id = actions.create_event(&connector, &session, &payload).await?;
//!     println!("Created event {}", id);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod dates;
pub mod form;
pub mod ledger;
pub mod remote;
pub mod types;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod devnet;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

// Re-export top-level types for convenience
pub use types::{Event, EventId, EventPayload, EventSummary, Timestamp};

pub use auth::{AuthError, DevIdentityProvider, Identity, IdentityProvider, Session, SessionStatus};

pub use ledger::{Connector, EventLedger, LedgerError, LedgerResult, MemoryConnector};

pub use remote::{Action, ActionError, EventActions, EventQuery, EventsQuery};

pub use form::{EventDraft, FormErrors};

pub use view::{DetailPanel, EventFilter};

pub use config::{Config, ConfigError, Network, NetworkConfig};
