//! Domain Types
//!
//! Shapes shared by the ledger transports, the session and the pages.
//! Field names follow the remote actor surface (camelCase on the wire).

use candid::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Identifier assigned by the remote ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(EventId)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        EventId(id)
    }
}

/// Input shape for event creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub location: String,
    pub start_time: Timestamp,
    pub completed: bool,
}

impl EventPayload {
    /// A not-yet-completed event
    pub fn new(title: impl Into<String>, location: impl Into<String>, start_time: Timestamp) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            start_time,
            completed: false,
        }
    }
}

/// Full event record as returned by `getEventDetail`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub location: String,
    pub start_time: Timestamp,
    pub completed: bool,
    pub creator: Principal,
    /// Remote order, each principal at most once
    pub attendees: Vec<Principal>,
}

impl Event {
    pub fn is_attending(&self, principal: &Principal) -> bool {
        self.attendees.iter().any(|p| p == principal)
    }

    pub fn is_creator(&self, principal: &Principal) -> bool {
        &self.creator == principal
    }

    pub fn attendee_count(&self) -> u64 {
        self.attendees.len() as u64
    }
}

/// List projection as returned by `getEvents`
///
/// Carries the remote attendee count instead of the attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: EventId,
    pub title: String,
    pub location: String,
    pub start_time: Timestamp,
    pub completed: bool,
    pub creator: Principal,
    pub num_of_attendees: u64,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            location: event.location.clone(),
            start_time: event.start_time,
            completed: event.completed,
            creator: event.creator,
            num_of_attendees: event.attendee_count(),
        }
    }
}

/// Shorten a principal for display ("abcde-fgh...")
pub fn short_principal(principal: &Principal, len: usize) -> String {
    let text = principal.to_text();
    if text.len() <= len {
        text
    } else {
        format!("{}...", &text[..len])
    }
}

/// "1 attendee", "3 attendees"
pub fn attendee_label(count: u64) -> String {
    format!("{} attendee{}", count, if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(n: u8) -> Principal {
        Principal::self_authenticating([n; 32])
    }

    #[test]
    fn test_event_id_parse() {
        assert_eq!("42".parse::<EventId>().unwrap(), EventId(42));
        assert_eq!(" 7 ".parse::<EventId>().unwrap(), EventId(7));
        assert!("abc".parse::<EventId>().is_err());
        assert!("-1".parse::<EventId>().is_err());
        assert_eq!(EventId(9).to_string(), "9");
    }

    #[test]
    fn test_wire_field_names() {
        let summary = EventSummary {
            id: EventId(3),
            title: "Meetup".to_string(),
            location: "Hall".to_string(),
            start_time: 1_700_000_000_000,
            completed: false,
            creator: Principal::anonymous(),
            num_of_attendees: 2,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["startTime"], 1_700_000_000_000i64);
        assert_eq!(json["numOfAttendees"], 2);
        assert_eq!(json["creator"], "2vxsx-fae");
    }

    #[test]
    fn test_event_membership() {
        let event = Event {
            id: EventId(1),
            title: "Meetup".to_string(),
            location: "Hall".to_string(),
            start_time: 0,
            completed: false,
            creator: principal(1),
            attendees: vec![principal(2), principal(3)],
        };

        assert!(event.is_creator(&principal(1)));
        assert!(!event.is_creator(&principal(2)));
        assert!(event.is_attending(&principal(3)));
        assert!(!event.is_attending(&principal(1)));

        let summary = EventSummary::from(&event);
        assert_eq!(summary.num_of_attendees, 2);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(attendee_label(0), "0 attendees");
        assert_eq!(attendee_label(1), "1 attendee");
        assert_eq!(attendee_label(5), "5 attendees");

        let anon = Principal::anonymous();
        assert_eq!(short_principal(&anon, 20), "2vxsx-fae");
        assert_eq!(short_principal(&anon, 4), "2vxs...");
    }
}
