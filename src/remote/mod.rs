//! Remote access
//!
//! Client-side state around ledger calls:
//!
//! - [`EventsQuery`]: the whole event list, refreshed on demand
//! - [`EventQuery`]: one event, re-fetched whenever its id changes
//! - [`EventActions`]: authenticated writes with a per-state loading flag
//!
//! Every piece has split `begin`/`settle` steps for reactive front-ends that
//! keep the state in a signal, and a combined async method for straight-line
//! callers.

pub mod actions;
pub mod fetch;

pub use actions::{Action, ActionError, EventActions};
pub use fetch::{EventQuery, EventsQuery, FetchState, EVENTS_ERROR, EVENT_ERROR};
