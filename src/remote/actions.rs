//! Authenticated writes: create, attend, complete.
//!
//! Each dispatch needs a live identity and builds its own short-lived
//! authenticated handle. The outcome comes back as one `Result`; the
//! [`EventActions`] error field mirrors its message for display.

use std::fmt;
use thiserror::Error;

use crate::auth::{Identity, Session};
use crate::ledger::{Connector, EventLedger, LedgerError};
use crate::types::{EventId, EventPayload};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// No live identity; nothing was sent
    #[error("User not authenticated")]
    Unauthenticated,

    /// The same action state already has a request in flight
    #[error("Another request is already in progress")]
    Busy,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// The three writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Attend,
    Complete,
}

impl Action {
    /// Shown when the failure carries no message of its own
    pub fn fallback_message(self) -> &'static str {
        match self {
            Action::Create => "Failed to create event. Please try again.",
            Action::Attend => "Failed to attend event. Please try again.",
            Action::Complete => "Failed to complete event. Please try again.",
        }
    }

    /// Notice shown after the write lands
    pub fn success_message(self) -> &'static str {
        match self {
            Action::Create => "Event created!",
            Action::Attend => "Successfully registered for the event!",
            Action::Complete => "Event marked as completed!",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Attend => write!(f, "attend"),
            Action::Complete => write!(f, "complete"),
        }
    }
}

impl ActionError {
    /// Message for the page: rejects and local refusals verbatim, transport
    /// trouble as the action's generic message.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            ActionError::Unauthenticated | ActionError::Busy => self.to_string(),
            ActionError::Ledger(LedgerError::Rejected { message, .. }) => message.clone(),
            ActionError::Ledger(_) => action.fallback_message().to_string(),
        }
    }
}

async fn authenticated<C: Connector>(
    connector: &C,
    identity: Option<&Identity>,
) -> Result<C::Ledger, ActionError> {
    let identity = identity
        .filter(|identity| identity.is_live())
        .ok_or(ActionError::Unauthenticated)?;
    Ok(connector.authenticated(identity).await?)
}

/// Create an event as `identity`; returns the assigned id
pub async fn create_event<C: Connector>(
    connector: &C,
    identity: Option<&Identity>,
    payload: &EventPayload,
) -> Result<EventId, ActionError> {
    let ledger = authenticated(connector, identity).await?;
    Ok(ledger.create_event(payload).await?)
}

/// Register `identity` as an attendee. Not deduplicated here.
pub async fn attend_event<C: Connector>(
    connector: &C,
    identity: Option<&Identity>,
    id: EventId,
) -> Result<(), ActionError> {
    let ledger = authenticated(connector, identity).await?;
    Ok(ledger.attend_event(id).await?)
}

/// Mark an event completed. There is no way back.
pub async fn complete_event<C: Connector>(
    connector: &C,
    identity: Option<&Identity>,
    id: EventId,
) -> Result<(), ActionError> {
    let ledger = authenticated(connector, identity).await?;
    Ok(ledger.complete_event(id).await?)
}

/// Loading flag and last error for a group of write controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventActions {
    loading: bool,
    error: Option<String>,
}

impl EventActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Claim the state for one request. Refuses while another is in flight.
    pub fn begin(&mut self) -> Result<(), ActionError> {
        if self.loading {
            return Err(ActionError::Busy);
        }
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// Release the state and record the outcome
    pub fn settle<T>(&mut self, action: Action, result: Result<T, ActionError>) -> Result<T, ActionError> {
        self.loading = false;
        if let Err(e) = &result {
            tracing::error!(action = %action, error = %e, "Failed to {} event", action);
            self.error = Some(e.user_message(action));
        }
        result
    }

    pub async fn create_event<C: Connector>(
        &mut self,
        connector: &C,
        session: &Session,
        payload: &EventPayload,
    ) -> Result<EventId, ActionError> {
        self.begin()?;
        let result = create_event(connector, session.identity(), payload).await;
        self.settle(Action::Create, result)
    }

    pub async fn attend_event<C: Connector>(
        &mut self,
        connector: &C,
        session: &Session,
        id: EventId,
    ) -> Result<(), ActionError> {
        self.begin()?;
        let result = attend_event(connector, session.identity(), id).await;
        self.settle(Action::Attend, result)
    }

    pub async fn complete_event<C: Connector>(
        &mut self,
        connector: &C,
        session: &Session,
        id: EventId,
    ) -> Result<(), ActionError> {
        self.begin()?;
        let result = complete_event(connector, session.identity(), id).await;
        self.settle(Action::Complete, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DevIdentityConfig, DevIdentityProvider};
    use crate::ledger::MemoryConnector;
    use candid::Principal;

    fn payload() -> EventPayload {
        EventPayload::new("Rust meetup", "Library", 1_900_000_000_000)
    }

    async fn signed_in(seed: &str) -> Session {
        let mut session = Session::new();
        session
            .login(&DevIdentityProvider::new(DevIdentityConfig::with_seed(seed)))
            .await;
        session
    }

    #[tokio::test]
    async fn test_unauthenticated_write_sends_nothing() {
        let connector = MemoryConnector::new();
        let mut actions = EventActions::new();
        let session = Session::new();

        let err = actions
            .create_event(&connector, &session, &payload())
            .await
            .unwrap_err();

        assert_eq!(err, ActionError::Unauthenticated);
        assert_eq!(actions.error(), Some("User not authenticated"));
        assert!(!actions.is_loading());
        assert_eq!(connector.store().request_count(), 0);

        assert!(attend_event(&connector, None, EventId(0)).await.is_err());
        assert!(complete_event(&connector, None, EventId(0)).await.is_err());
        assert_eq!(connector.store().request_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_identity_counts_as_absent() {
        let connector = MemoryConnector::new();
        let stale = Identity::new(Principal::self_authenticating(b"alice")).expiring_at(1);

        let err = create_event(&connector, Some(&stale), &payload()).await.unwrap_err();
        assert_eq!(err, ActionError::Unauthenticated);
        assert_eq!(connector.store().request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_attend_complete() {
        let connector = MemoryConnector::new();
        let alice = signed_in("alice").await;
        let bob = signed_in("bob").await;
        let mut actions = EventActions::new();

        let id = actions.create_event(&connector, &alice, &payload()).await.unwrap();
        assert_eq!(id, EventId(0));
        assert!(actions.error().is_none());

        actions.attend_event(&connector, &bob, id).await.unwrap();
        actions.complete_event(&connector, &alice, id).await.unwrap();

        let event = connector.store().get_event_detail(id).unwrap();
        assert!(event.completed);
        assert_eq!(event.attendees, vec![bob.principal().unwrap()]);
        assert_eq!(event.creator, alice.principal().unwrap());
    }

    #[tokio::test]
    async fn test_remote_rejection_is_returned_and_recorded() {
        let connector = MemoryConnector::new();
        let alice = signed_in("alice").await;
        let bob = signed_in("bob").await;
        let mut actions = EventActions::new();
        let id = actions.create_event(&connector, &alice, &payload()).await.unwrap();

        let err = actions.complete_event(&connector, &bob, id).await.unwrap_err();
        assert!(matches!(err, ActionError::Ledger(LedgerError::Rejected { .. })));
        assert_eq!(actions.error(), Some("Only the organizer can complete this event"));
        assert!(!actions.is_loading());

        // No dedup in the dispatch layer: the second attend reaches the ledger
        actions.attend_event(&connector, &bob, id).await.unwrap();
        let requests = connector.store().request_count();
        assert!(actions.attend_event(&connector, &bob, id).await.is_err());
        assert_eq!(connector.store().request_count(), requests + 1);

        actions.clear_error();
        assert!(actions.error().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_uses_fallback_message() {
        let connector = MemoryConnector::new();
        let alice = signed_in("alice").await;
        let mut actions = EventActions::new();

        connector.store().fail_next(LedgerError::Timeout).unwrap();
        let err = actions.create_event(&connector, &alice, &payload()).await.unwrap_err();

        assert_eq!(err, ActionError::Ledger(LedgerError::Timeout));
        assert_eq!(actions.error(), Some(Action::Create.fallback_message()));
    }

    #[test]
    fn test_busy_while_loading() {
        let mut actions = EventActions::new();
        actions.begin().unwrap();
        assert_eq!(actions.begin(), Err(ActionError::Busy));

        let settled: Result<(), ActionError> = actions.settle(Action::Attend, Ok(()));
        assert!(settled.is_ok());
        assert!(actions.begin().is_ok());
    }
}
