//! Application session
//!
//! One per running application. Starts anonymous, moves to authenticated on a
//! successful login and back on logout. Failed transitions leave the state as
//! it was and are only logged.

use candid::Principal;

use super::identity::{AuthError, Identity, IdentityProvider};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    /// Login or logout in flight
    pending: bool,
}

impl Session {
    /// A fresh anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// The stored identity, if it is still live
    pub fn identity(&self) -> Option<&Identity> {
        match &self.status {
            SessionStatus::Authenticated(identity) if identity.is_live() => Some(identity),
            _ => None,
        }
    }

    pub fn principal(&self) -> Option<Principal> {
        self.identity().map(Identity::principal)
    }

    /// Mark a login/logout as started. Returns false if one is already running.
    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn settle_login(&mut self, result: Result<Identity, AuthError>) {
        self.pending = false;
        match result {
            Ok(identity) => {
                tracing::info!(principal = %identity.principal(), "Signed in");
                self.status = SessionStatus::Authenticated(identity);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
            }
        }
    }

    pub fn settle_logout(&mut self, result: Result<(), AuthError>) {
        self.pending = false;
        match result {
            Ok(()) => {
                tracing::info!("Signed out");
                self.status = SessionStatus::Anonymous;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-out failed");
            }
        }
    }

    /// Run the provider's sign-in flow. Returns whether the session is now authenticated.
    pub async fn login(&mut self, provider: &dyn IdentityProvider) -> bool {
        if !self.begin() {
            return self.is_authenticated();
        }
        tracing::debug!(provider = provider.name(), "Starting sign-in");
        let result = provider.authenticate().await;
        self.settle_login(result);
        self.is_authenticated()
    }

    /// Sign out and drop the identity. Returns whether the session is now anonymous.
    pub async fn logout(&mut self, provider: &dyn IdentityProvider) -> bool {
        let identity = match &self.status {
            SessionStatus::Authenticated(identity) => identity.clone(),
            SessionStatus::Anonymous => return true,
        };
        if !self.begin() {
            return false;
        }
        let result = provider.sign_out(&identity).await;
        self.settle_logout(result);
        matches!(self.status, SessionStatus::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{DevIdentityConfig, DevIdentityProvider};
    use async_trait::async_trait;

    struct Declining;

    #[async_trait(?Send)]
    impl IdentityProvider for Declining {
        fn name(&self) -> &str {
            "declining"
        }

        async fn authenticate(&self) -> Result<Identity, AuthError> {
            Err(AuthError::Declined)
        }

        async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
            Err(AuthError::Provider("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let provider = DevIdentityProvider::new(DevIdentityConfig::with_seed("alice"));
        let mut session = Session::new();
        assert!(!session.is_authenticated());

        assert!(session.login(&provider).await);
        assert_eq!(session.principal(), Some(provider.principal()));
        assert!(!session.is_pending());

        assert!(session.logout(&provider).await);
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), &SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_declined_login_keeps_state() {
        let mut session = Session::new();
        assert!(!session.login(&Declining).await);
        assert_eq!(session, Session::new());
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_identity() {
        let provider = DevIdentityProvider::new(DevIdentityConfig::with_seed("alice"));
        let mut session = Session::new();
        session.login(&provider).await;

        assert!(!session.logout(&Declining).await);
        assert_eq!(session.principal(), Some(provider.principal()));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_begin_is_exclusive() {
        let mut session = Session::new();
        assert!(session.begin());
        assert!(!session.begin());
        session.settle_login(Err(AuthError::Declined));
        assert!(session.begin());
    }

    #[test]
    fn test_expired_identity_is_not_exposed() {
        let mut session = Session::new();
        let identity = Identity::new(Principal::self_authenticating(b"old")).expiring_at(1);
        session.begin();
        session.settle_login(Ok(identity));

        assert!(matches!(session.status(), SessionStatus::Authenticated(_)));
        assert!(session.identity().is_none());
        assert!(!session.is_authenticated());
    }
}
