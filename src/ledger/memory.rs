//! In-process event actor
//!
//! [`LedgerStore`] keeps events in memory with the rules the client relies
//! on from the real actor. It backs the local devnet server and
//! [`MemoryConnector`], which tests use in place of a network.

use async_trait::async_trait;
use candid::Principal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::wire::reject_code;
use super::{Connector, EventLedger, LedgerError, LedgerResult};
use crate::auth::Identity;
use crate::types::{Event, EventId, EventPayload, EventSummary};

#[derive(Debug, Default)]
struct StoreInner {
    /// Insertion order is the order `getEvents` reports
    events: Vec<Event>,
    next_id: u64,
    /// Returned by the next request instead of running it
    fail_next: Option<LedgerError>,
}

/// Shared in-memory event store
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: Mutex<StoreInner>,
    requests: AtomicUsize,
    root_key: String,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            root_key: "308182301d060d2b0601040182dc7c0503010201060c2b0601040182dc7c05030201036100"
                .to_string(),
            ..Default::default()
        }
    }

    /// Root key reported by the status endpoint
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// Number of requests that reached the store
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: LedgerError) -> LedgerResult<()> {
        self.lock()?.fail_next = Some(error);
        Ok(())
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Transport("ledger store lock poisoned".to_string()))
    }

    /// Count the request and take the injected failure, if any
    fn enter(&self) -> LedgerResult<MutexGuard<'_, StoreInner>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.lock()?;
        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }
        Ok(inner)
    }

    pub fn get_events(&self) -> LedgerResult<Vec<EventSummary>> {
        let inner = self.enter()?;
        Ok(inner.events.iter().map(EventSummary::from).collect())
    }

    pub fn get_event_detail(&self, id: EventId) -> LedgerResult<Event> {
        let inner = self.enter()?;
        inner
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    pub fn create_event(&self, caller: Principal, payload: &EventPayload) -> LedgerResult<EventId> {
        let mut inner = self.enter()?;
        require_signed(caller)?;

        let id = EventId(inner.next_id);
        inner.next_id += 1;
        inner.events.push(Event {
            id,
            title: payload.title.clone(),
            location: payload.location.clone(),
            start_time: payload.start_time,
            completed: payload.completed,
            creator: caller,
            attendees: Vec::new(),
        });

        tracing::debug!(event_id = %id, creator = %caller, "Created event");
        Ok(id)
    }

    pub fn attend_event(&self, caller: Principal, id: EventId) -> LedgerResult<()> {
        let mut inner = self.enter()?;
        require_signed(caller)?;

        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;

        if event.completed {
            return Err(LedgerError::rejected(
                reject_code::CANISTER_REJECT,
                "Event is already completed",
            ));
        }
        if event.is_attending(&caller) {
            return Err(LedgerError::rejected(
                reject_code::CANISTER_REJECT,
                "Already attending this event",
            ));
        }

        event.attendees.push(caller);
        tracing::debug!(event_id = %id, attendee = %caller, "Registered attendee");
        Ok(())
    }

    pub fn complete_event(&self, caller: Principal, id: EventId) -> LedgerResult<()> {
        let mut inner = self.enter()?;
        require_signed(caller)?;

        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;

        if !event.is_creator(&caller) {
            return Err(LedgerError::rejected(
                reject_code::CANISTER_REJECT,
                "Only the organizer can complete this event",
            ));
        }
        if event.completed {
            return Err(LedgerError::rejected(
                reject_code::CANISTER_REJECT,
                "Event is already completed",
            ));
        }

        event.completed = true;
        tracing::debug!(event_id = %id, "Completed event");
        Ok(())
    }
}

fn not_found() -> LedgerError {
    LedgerError::rejected(reject_code::CANISTER_REJECT, "Event not found")
}

fn require_signed(caller: Principal) -> LedgerResult<()> {
    if caller == Principal::anonymous() {
        Err(LedgerError::rejected(
            reject_code::CANISTER_REJECT,
            "Anonymous callers cannot modify events",
        ))
    } else {
        Ok(())
    }
}

/// Handle onto a [`LedgerStore`] acting as one caller
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    store: Arc<LedgerStore>,
    caller: Principal,
}

impl MemoryLedger {
    pub fn caller(&self) -> Principal {
        self.caller
    }
}

#[async_trait(?Send)]
impl EventLedger for MemoryLedger {
    async fn get_events(&self) -> LedgerResult<Vec<EventSummary>> {
        self.store.get_events()
    }

    async fn get_event_detail(&self, id: EventId) -> LedgerResult<Event> {
        self.store.get_event_detail(id)
    }

    async fn create_event(&self, payload: &EventPayload) -> LedgerResult<EventId> {
        self.store.create_event(self.caller, payload)
    }

    async fn attend_event(&self, id: EventId) -> LedgerResult<()> {
        self.store.attend_event(self.caller, id)
    }

    async fn complete_event(&self, id: EventId) -> LedgerResult<()> {
        self.store.complete_event(self.caller, id)
    }
}

/// Connector producing [`MemoryLedger`] handles
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: Arc<LedgerStore>,
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::with_store(Arc::new(LedgerStore::new()))
    }

    pub fn with_store(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }
}

#[async_trait(?Send)]
impl Connector for MemoryConnector {
    type Ledger = MemoryLedger;

    fn anonymous(&self) -> MemoryLedger {
        MemoryLedger {
            store: Arc::clone(&self.store),
            caller: Principal::anonymous(),
        }
    }

    async fn authenticated(&self, identity: &Identity) -> LedgerResult<MemoryLedger> {
        Ok(MemoryLedger {
            store: Arc::clone(&self.store),
            caller: identity.principal(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(name: &str) -> Principal {
        Principal::self_authenticating(name.as_bytes())
    }

    fn payload(title: &str) -> EventPayload {
        EventPayload::new(title, "Main hall", 1_900_000_000_000)
    }

    #[test]
    fn test_sequential_ids_and_order() {
        let store = LedgerStore::new();
        let alice = principal("alice");

        assert_eq!(store.create_event(alice, &payload("First")).unwrap(), EventId(0));
        assert_eq!(store.create_event(alice, &payload("Second")).unwrap(), EventId(1));

        let titles: Vec<_> = store.get_events().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(store.request_count(), 3);
    }

    #[test]
    fn test_anonymous_writes_rejected() {
        let store = LedgerStore::new();
        let err = store
            .create_event(Principal::anonymous(), &payload("Nope"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected { .. }));
        assert!(store.get_events().unwrap().is_empty());
    }

    #[test]
    fn test_attend_rules() {
        let store = LedgerStore::new();
        let alice = principal("alice");
        let bob = principal("bob");
        let id = store.create_event(alice, &payload("Meetup")).unwrap();

        store.attend_event(bob, id).unwrap();
        assert_eq!(
            store.attend_event(bob, id).unwrap_err().to_string(),
            "Already attending this event"
        );

        let detail = store.get_event_detail(id).unwrap();
        assert_eq!(detail.attendees, vec![bob]);

        let summaries = store.get_events().unwrap();
        assert_eq!(summaries[0].num_of_attendees, detail.attendee_count());

        assert!(store.attend_event(bob, EventId(99)).is_err());
    }

    #[test]
    fn test_complete_rules() {
        let store = LedgerStore::new();
        let alice = principal("alice");
        let bob = principal("bob");
        let id = store.create_event(alice, &payload("Meetup")).unwrap();

        assert_eq!(
            store.complete_event(bob, id).unwrap_err().to_string(),
            "Only the organizer can complete this event"
        );
        store.complete_event(alice, id).unwrap();
        assert!(store.get_event_detail(id).unwrap().completed);
        assert!(store.complete_event(alice, id).is_err());
        assert_eq!(
            store.attend_event(bob, id).unwrap_err().to_string(),
            "Event is already completed"
        );
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let store = LedgerStore::new();
        store.fail_next(LedgerError::Unavailable).unwrap();

        assert_eq!(store.get_events().unwrap_err(), LedgerError::Unavailable);
        assert!(store.get_events().unwrap().is_empty());
        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn test_connector_binds_caller() {
        let connector = MemoryConnector::new();
        let alice = Identity::new(principal("alice"));

        let anon = connector.anonymous();
        assert_eq!(anon.caller(), Principal::anonymous());
        assert!(anon.create_event(&payload("x")).await.is_err());

        let signed = connector.authenticated(&alice).await.unwrap();
        let id = signed.create_event(&payload("Meetup")).await.unwrap();
        let event = anon.get_event_detail(id).await.unwrap();
        assert_eq!(event.creator, alice.principal());
    }
}
