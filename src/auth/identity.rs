//! Caller identities and the providers that issue them.

use async_trait::async_trait;
use candid::Principal;
use thiserror::Error;

use crate::dates::now_millis;
use crate::types::Timestamp;

/// Default delegation lifetime: 8 hours
pub const DEFAULT_IDENTITY_TTL_MS: i64 = 8 * 60 * 60 * 1000;

/// An authenticated caller as handed out by an [`IdentityProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    principal: Principal,
    /// Delegation expiry; `None` never expires
    expires_at: Option<Timestamp>,
}

impl Identity {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn principal(&self) -> Principal {
        self.principal
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// Usable for signing at `now`. The anonymous principal never is.
    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.principal != Principal::anonymous() && self.expires_at.map_or(true, |exp| exp > now)
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(now_millis())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Sign-in was declined")]
    Declined,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// The delegated identity flow
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Run the sign-in flow and return the delegated identity
    async fn authenticate(&self) -> Result<Identity, AuthError>;

    /// Revoke whatever the provider holds for `identity`
    async fn sign_out(&self, identity: &Identity) -> Result<(), AuthError>;
}

/// Options for [`DevIdentityProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevIdentityConfig {
    /// Seed the principal is derived from; equal seeds give equal principals
    pub seed: String,
    /// Lifetime of the issued identity; `None` for no expiry
    pub ttl_ms: Option<i64>,
}

impl Default for DevIdentityConfig {
    fn default() -> Self {
        Self {
            seed: "chronox-dev".to_string(),
            ttl_ms: Some(DEFAULT_IDENTITY_TTL_MS),
        }
    }
}

impl DevIdentityConfig {
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Default::default()
        }
    }
}

/// Development provider issuing self-authenticating principals from a seed
#[derive(Debug, Clone)]
pub struct DevIdentityProvider {
    config: DevIdentityConfig,
}

impl DevIdentityProvider {
    pub fn new(config: DevIdentityConfig) -> Self {
        Self { config }
    }

    pub fn principal(&self) -> Principal {
        Principal::self_authenticating(self.config.seed.as_bytes())
    }
}

#[async_trait(?Send)]
impl IdentityProvider for DevIdentityProvider {
    fn name(&self) -> &str {
        "dev"
    }

    async fn authenticate(&self) -> Result<Identity, AuthError> {
        if self.config.seed.trim().is_empty() {
            return Err(AuthError::Provider("identity seed is empty".to_string()));
        }

        let identity = Identity::new(self.principal());
        Ok(match self.config.ttl_ms {
            Some(ttl) => identity.expiring_at(now_millis() + ttl),
            None => identity,
        })
    }

    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_liveness() {
        let principal = Principal::self_authenticating(b"alice");
        let identity = Identity::new(principal).expiring_at(1_000);

        assert!(identity.is_live_at(999));
        assert!(!identity.is_live_at(1_000));
        assert!(Identity::new(principal).is_live_at(i64::MAX));
        assert!(!Identity::new(Principal::anonymous()).is_live_at(0));
    }

    #[tokio::test]
    async fn test_dev_provider_is_deterministic() {
        let a = DevIdentityProvider::new(DevIdentityConfig::with_seed("alice"));
        let b = DevIdentityProvider::new(DevIdentityConfig::with_seed("alice"));
        let c = DevIdentityProvider::new(DevIdentityConfig::with_seed("bob"));

        let ia = a.authenticate().await.unwrap();
        let ib = b.authenticate().await.unwrap();
        let ic = c.authenticate().await.unwrap();

        assert_eq!(ia.principal(), ib.principal());
        assert_ne!(ia.principal(), ic.principal());
        assert!(ia.is_live());
        assert!(ia.expires_at().is_some());
    }

    #[tokio::test]
    async fn test_dev_provider_rejects_empty_seed() {
        let provider = DevIdentityProvider::new(DevIdentityConfig::with_seed("  "));
        assert!(matches!(
            provider.authenticate().await,
            Err(AuthError::Provider(_))
        ));
    }
}
