//! Read-side state: the event list and a single event record.
//!
//! Both follow the same contract: `loading` goes true before the request and
//! false once it settles; a failure records a user-facing message and keeps
//! whatever data was held before. Nothing retries on its own.

use crate::ledger::{Connector, EventLedger, LedgerResult};
use crate::types::{Event, EventId, EventSummary};

pub const EVENTS_ERROR: &str = "Failed to load events. Please try again.";
pub const EVENT_ERROR: &str = "Failed to load event details. Please try again.";

/// Data plus request status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    data: T,
    loading: bool,
    error: Option<String>,
}

impl<T> FetchState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a settled request. Returns true on success.
    pub fn settle<E: std::fmt::Display>(&mut self, result: Result<T, E>, message: &str) -> bool {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "{}", message);
                self.error = Some(message.to_string());
                false
            }
        }
    }
}

/// The full event list, in server order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    state: FetchState<Vec<EventSummary>>,
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl EventsQuery {
    pub fn new() -> Self {
        Self {
            state: FetchState::new(Vec::new()),
        }
    }

    pub fn events(&self) -> &[EventSummary] {
        self.state.data()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn begin(&mut self) {
        self.state.begin();
    }

    pub fn settle(&mut self, result: LedgerResult<Vec<EventSummary>>) -> bool {
        self.state.settle(result, EVENTS_ERROR)
    }

    /// Anonymous read of every event
    pub async fn fetch<C: Connector>(&mut self, connector: &C) -> bool {
        self.begin();
        let result = connector.anonymous().get_events().await;
        self.settle(result)
    }

    /// Re-issue the same read
    pub async fn refetch<C: Connector>(&mut self, connector: &C) -> bool {
        self.fetch(connector).await
    }
}

/// One event record, keyed by an optional id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventQuery {
    id: Option<EventId>,
    state: FetchState<Option<Event>>,
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::new(T::default())
    }
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<EventId> {
        self.id
    }

    /// `None` until a fetch has succeeded
    pub fn event(&self) -> Option<&Event> {
        self.state.data().as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Point the query at a new id. Returns true when a fetch is now due.
    ///
    /// A different id drops the record held for the old one.
    pub fn set_id(&mut self, id: Option<EventId>) -> bool {
        if self.id == id {
            return false;
        }
        self.id = id;
        self.state = FetchState::new(None);
        id.is_some()
    }

    /// Start a fetch for the current id, if there is one
    pub fn begin(&mut self) -> Option<EventId> {
        let id = self.id?;
        self.state.begin();
        Some(id)
    }

    /// Apply a reply for `id`. Replies for an id the query has moved away
    /// from are dropped.
    pub fn settle(&mut self, id: EventId, result: LedgerResult<Event>) -> bool {
        if self.id != Some(id) {
            tracing::debug!(event_id = %id, "Dropping reply for stale event id");
            return false;
        }
        self.state.settle(result.map(Some), EVENT_ERROR)
    }

    /// Fetch the current id. No-op without one.
    pub async fn fetch<C: Connector>(&mut self, connector: &C) -> bool {
        let Some(id) = self.begin() else {
            return false;
        };
        let result = connector.anonymous().get_event_detail(id).await;
        self.settle(id, result)
    }

    pub async fn refetch<C: Connector>(&mut self, connector: &C) -> bool {
        self.fetch(connector).await
    }

    /// Follow an id input: fetch when it changed to a present value
    pub async fn watch<C: Connector>(&mut self, connector: &C, id: Option<EventId>) -> bool {
        if self.set_id(id) {
            self.fetch(connector).await
        } else {
            false
        }
    }
}
