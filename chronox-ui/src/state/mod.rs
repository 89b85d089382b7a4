//! State Management
//!
//! The application session and the gateway connector, provided as context.

pub mod app;

pub use app::{provide_app_state, use_app_state, AppState};
