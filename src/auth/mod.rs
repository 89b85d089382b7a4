//! Authentication
//!
//! - **Identity**: a delegated caller principal with an optional expiry
//! - **IdentityProvider**: the sign-in flow that issues identities
//! - **Session**: the single application-wide login state

mod identity;
mod session;

pub use identity::{
    AuthError, DevIdentityConfig, DevIdentityProvider, Identity, IdentityProvider,
    DEFAULT_IDENTITY_TTL_MS,
};
pub use session::{Session, SessionStatus};
