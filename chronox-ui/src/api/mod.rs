//! Gateway Access
//!
//! gloo-net transport for the event actor and the build-time network
//! settings it targets.

pub mod ledger;

pub use ledger::{network_config, GlooConnector, GlooLedger};
