//! View-model decisions shared by the browser pages and the CLI
//!
//! Pure functions of the fetched records, the signed-in principal and the
//! current instant.

use candid::Principal;
use std::fmt;
use std::str::FromStr;

use crate::dates;
use crate::types::{short_principal, Event, EventSummary, Timestamp};

/// Principal prefix length on event cards
pub const CARD_PRINCIPAL_CHARS: usize = 8;
/// Principal prefix length on the detail page
pub const DETAIL_PRINCIPAL_CHARS: usize = 12;

pub fn status_label(completed: bool) -> &'static str {
    if completed {
        "Completed"
    } else {
        "Upcoming"
    }
}

/// Relative start label, shown only for events still ahead and open
pub fn relative_label(start_time: Timestamp, completed: bool, now: Timestamp) -> Option<String> {
    (!completed && dates::is_upcoming_at(start_time, now))
        .then(|| dates::relative_time_at(start_time, now))
}

/// Shortened principal, with a " (You)" marker for the viewer
pub fn principal_label(principal: &Principal, viewer: Option<Principal>, len: usize) -> String {
    let short = short_principal(principal, len);
    if viewer == Some(*principal) {
        format!("{} (You)", short)
    } else {
        short
    }
}

/// Event list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Upcoming,
    Completed,
}

impl EventFilter {
    pub const ALL: [EventFilter; 3] = [EventFilter::All, EventFilter::Upcoming, EventFilter::Completed];

    /// "Upcoming" means not completed, whatever the start time
    pub fn matches(self, event: &EventSummary) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Upcoming => !event.completed,
            EventFilter::Completed => event.completed,
        }
    }

    pub fn apply(self, events: &[EventSummary]) -> Vec<&EventSummary> {
        events.iter().filter(|e| self.matches(e)).collect()
    }

    pub fn count(self, events: &[EventSummary]) -> usize {
        events.iter().filter(|e| self.matches(e)).count()
    }

    pub fn label(self) -> &'static str {
        match self {
            EventFilter::All => "All Events",
            EventFilter::Upcoming => "Upcoming",
            EventFilter::Completed => "Completed",
        }
    }

    /// Text for a filter with no matches
    pub fn empty_message(self) -> String {
        match self {
            EventFilter::All => "There are no events yet. Be the first to create one!".to_string(),
            other => format!("No {} events found.", other),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::All => write!(f, "all"),
            EventFilter::Upcoming => write!(f, "upcoming"),
            EventFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for EventFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(EventFilter::All),
            "upcoming" => Ok(EventFilter::Upcoming),
            "completed" => Ok(EventFilter::Completed),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// What the action area of the detail page offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPanel {
    /// Event is completed; nothing to do, signed in or not
    Completed,
    /// Anonymous viewer of an open event
    SignIn,
    /// The organizer: attend (unless already attending) and mark completed
    Organizer { attending: bool },
    Attending,
    /// Start time has passed without completion
    RegistrationClosed,
    Attend,
}

impl DetailPanel {
    pub fn decide(event: &Event, viewer: Option<Principal>, now: Timestamp) -> Self {
        if event.completed {
            return DetailPanel::Completed;
        }
        let Some(viewer) = viewer else {
            return DetailPanel::SignIn;
        };

        let attending = event.is_attending(&viewer);
        if event.is_creator(&viewer) {
            DetailPanel::Organizer { attending }
        } else if attending {
            DetailPanel::Attending
        } else if !dates::is_upcoming_at(event.start_time, now) {
            DetailPanel::RegistrationClosed
        } else {
            DetailPanel::Attend
        }
    }

    pub fn can_attend(self) -> bool {
        matches!(
            self,
            DetailPanel::Attend | DetailPanel::Organizer { attending: false }
        )
    }

    pub fn can_complete(self) -> bool {
        matches!(self, DetailPanel::Organizer { .. })
    }

    /// Status line for panels without buttons
    pub fn notice(self) -> Option<&'static str> {
        match self {
            DetailPanel::Completed => Some("This event has been completed"),
            DetailPanel::SignIn => Some("Sign in to attend this event"),
            DetailPanel::Attending | DetailPanel::Organizer { attending: true } => {
                Some("You're attending")
            }
            DetailPanel::RegistrationClosed => Some("Event registration closed"),
            DetailPanel::Organizer { attending: false } | DetailPanel::Attend => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;

    const NOW: Timestamp = 1_780_000_000_000;
    const HOUR: Timestamp = 60 * 60 * 1000;

    fn principal(name: &str) -> Principal {
        Principal::self_authenticating(name.as_bytes())
    }

    fn event(completed: bool, start_time: Timestamp) -> Event {
        Event {
            id: EventId(3),
            title: "Meetup".to_string(),
            location: "Hall".to_string(),
            start_time,
            completed,
            creator: principal("alice"),
            attendees: vec![principal("bob")],
        }
    }

    fn summary(id: u64, completed: bool) -> EventSummary {
        EventSummary {
            id: EventId(id),
            title: format!("Event {}", id),
            location: "Hall".to_string(),
            start_time: NOW,
            completed,
            creator: principal("alice"),
            num_of_attendees: 0,
        }
    }

    #[test]
    fn test_completed_never_offers_attend() {
        let done = event(true, NOW + HOUR);
        for viewer in [None, Some(principal("alice")), Some(principal("bob")), Some(principal("carol"))] {
            let panel = DetailPanel::decide(&done, viewer, NOW);
            assert_eq!(panel, DetailPanel::Completed);
            assert!(!panel.can_attend());
            assert!(!panel.can_complete());
        }
    }

    #[test]
    fn test_open_event_panels() {
        let open = event(false, NOW + HOUR);

        assert_eq!(DetailPanel::decide(&open, None, NOW), DetailPanel::SignIn);
        assert_eq!(
            DetailPanel::decide(&open, Some(principal("alice")), NOW),
            DetailPanel::Organizer { attending: false }
        );
        assert_eq!(
            DetailPanel::decide(&open, Some(principal("bob")), NOW),
            DetailPanel::Attending
        );

        let carol = DetailPanel::decide(&open, Some(principal("carol")), NOW);
        assert_eq!(carol, DetailPanel::Attend);
        assert!(carol.can_attend());
        assert!(carol.notice().is_none());
    }

    #[test]
    fn test_past_open_event_is_closed_for_newcomers() {
        let past = event(false, NOW - HOUR);
        assert_eq!(
            DetailPanel::decide(&past, Some(principal("carol")), NOW),
            DetailPanel::RegistrationClosed
        );
        // The organizer can still complete it
        assert!(DetailPanel::decide(&past, Some(principal("alice")), NOW).can_complete());
    }

    #[test]
    fn test_filters_and_counts() {
        let events = vec![summary(0, false), summary(1, true), summary(2, false)];

        assert_eq!(EventFilter::All.count(&events), 3);
        assert_eq!(EventFilter::Upcoming.count(&events), 2);
        assert_eq!(EventFilter::Completed.count(&events), 1);

        let ids: Vec<_> = EventFilter::Upcoming.apply(&events).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EventId(0), EventId(2)]);

        assert_eq!("Completed".parse::<EventFilter>().unwrap(), EventFilter::Completed);
        assert!("soon".parse::<EventFilter>().is_err());
        assert_eq!(EventFilter::Completed.empty_message(), "No completed events found.");
    }

    #[test]
    fn test_relative_label_only_for_open_future_events() {
        assert_eq!(relative_label(NOW + 2 * HOUR, false, NOW).as_deref(), Some("In 2 hours"));
        assert!(relative_label(NOW + 2 * HOUR, true, NOW).is_none());
        assert!(relative_label(NOW - HOUR, false, NOW).is_none());
    }

    #[test]
    fn test_principal_label_marks_viewer() {
        let alice = principal("alice");
        let label = principal_label(&alice, Some(alice), CARD_PRINCIPAL_CHARS);
        assert!(label.ends_with("... (You)"));
        assert!(!principal_label(&alice, None, CARD_PRINCIPAL_CHARS).contains("You"));
    }
}
