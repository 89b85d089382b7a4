//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod button;
pub mod card;
pub mod event_card;
pub mod header;
pub mod input;
pub mod loading;
pub mod toast;

pub use button::{Button, ButtonSize, ButtonVariant};
pub use card::Card;
pub use event_card::EventCard;
pub use header::Header;
pub use input::Input;
pub use loading::Loading;
pub use toast::Toast;
