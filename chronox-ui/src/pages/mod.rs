//! Application Pages
//!
//! Top-level page components for each route.

pub mod create_event;
pub mod event_detail;
pub mod events;
pub mod home;

pub use create_event::CreateEvent;
pub use event_detail::EventDetail;
pub use events::Events;
pub use home::Home;
