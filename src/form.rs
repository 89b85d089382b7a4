//! Create-event form validation
//!
//! Raw control values go in, an [`EventPayload`] or a set of per-field
//! messages comes out. Nothing here touches the network.

use chrono::{Local, TimeZone};
use std::fmt;

use crate::dates;
use crate::types::{EventPayload, Timestamp};

pub const TITLE_REQUIRED: &str = "Event title is required";
pub const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters long";
pub const LOCATION_REQUIRED: &str = "Location is required";
pub const START_REQUIRED: &str = "Start time is required";
pub const START_INVALID: &str = "Start time is not a valid date";
pub const START_IN_PAST: &str = "Start time must be in the future";

/// Shortest accepted title, in characters after trimming
pub const MIN_TITLE_CHARS: usize = 3;

/// Form controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Location,
    StartTime,
}

impl Field {
    /// Control name as used by the form markup
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Location => "location",
            Field::StartTime => "startTime",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.location.is_none() && self.start_time.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Location => self.location.as_deref(),
            Field::StartTime => self.start_time.as_deref(),
        }
    }

    /// Drop the message for one field, e.g. once the user edits it
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Title => self.title = None,
            Field::Location => self.location = None,
            Field::StartTime => self.start_time = None,
        }
    }

    fn set(&mut self, field: Field, message: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Location => &mut self.location,
            Field::StartTime => &mut self.start_time,
        };
        *slot = Some(message.to_string());
    }

    /// All messages in form order, joined for single-line output
    pub fn summary(&self) -> String {
        [Field::Title, Field::Location, Field::StartTime]
            .into_iter()
            .filter_map(|field| self.get(field).map(|msg| format!("{}: {}", field, msg)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for FormErrors {}

/// Unvalidated form values. `start_time` holds the `datetime-local` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub location: String,
    pub start_time: String,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            start_time: start_time.into(),
        }
    }

    /// Validate against `now`, reading the start time in the local zone
    pub fn validate(&self, now: Timestamp) -> Result<EventPayload, FormErrors> {
        self.validate_in(now, &Local)
    }

    pub fn validate_in<Tz: TimeZone>(
        &self,
        now: Timestamp,
        tz: &Tz,
    ) -> Result<EventPayload, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.set(Field::Title, TITLE_REQUIRED);
        } else if title.chars().count() < MIN_TITLE_CHARS {
            errors.set(Field::Title, TITLE_TOO_SHORT);
        }

        let location = self.location.trim();
        if location.is_empty() {
            errors.set(Field::Location, LOCATION_REQUIRED);
        }

        let start_time = if self.start_time.trim().is_empty() {
            errors.set(Field::StartTime, START_REQUIRED);
            None
        } else {
            match dates::convert_to_timestamp_in(self.start_time.trim(), tz) {
                Ok(ts) if ts <= now => {
                    errors.set(Field::StartTime, START_IN_PAST);
                    None
                }
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected start time");
                    errors.set(Field::StartTime, START_INVALID);
                    None
                }
            }
        };

        match start_time {
            Some(start_time) if errors.is_empty() => {
                Ok(EventPayload::new(title, location, start_time))
            }
            _ => Err(errors),
        }
    }
}
