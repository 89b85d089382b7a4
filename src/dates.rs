//! Date and relative-time utilities
//!
//! Conversions between millisecond timestamps and the strings shown on event
//! cards, the detail page and the create form. "Now" is read at call time;
//! nothing here is cached across renders.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::types::Timestamp;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Earliest offset the create form offers for a start time
pub const MIN_START_OFFSET_MINUTES: i64 = 30;

/// Layout produced by a `datetime-local` form control
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const INPUT_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date/time: {0}")]
    Parse(String),

    #[error("Local time does not exist: {0}")]
    NonexistentLocalTime(String),

    #[error("Timestamp out of range: {0}")]
    OutOfRange(Timestamp),
}

/// Current instant in milliseconds
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

fn to_datetime<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(timestamp).map(|dt| dt.with_timezone(tz))
}

/// "May 1, 2026, 02:30 PM" in the local time zone
pub fn format_date_time(timestamp: Timestamp) -> String {
    format_date_time_in(timestamp, &Local)
}

pub fn format_date_time_in<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    to_datetime(timestamp, tz)
        .map(|dt| dt.format("%B %-d, %Y, %I:%M %p").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// Like [`format_date_time`], but an unrepresentable timestamp is an error
/// instead of placeholder text
pub fn try_format_date_time(timestamp: Timestamp) -> Result<String, DateError> {
    to_datetime(timestamp, &Local)
        .map(|dt| dt.format("%B %-d, %Y, %I:%M %p").to_string())
        .ok_or(DateError::OutOfRange(timestamp))
}

/// "May 1, 2026" in the local time zone
pub fn format_date(timestamp: Timestamp) -> String {
    format_date_in(timestamp, &Local)
}

pub fn format_date_in<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    to_datetime(timestamp, tz)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// "02:30 PM" in the local time zone
pub fn format_time(timestamp: Timestamp) -> String {
    format_time_in(timestamp, &Local)
}

pub fn format_time_in<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    to_datetime(timestamp, tz)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// True when the event starts strictly after the current instant
pub fn is_upcoming(timestamp: Timestamp) -> bool {
    is_upcoming_at(timestamp, now_millis())
}

pub fn is_upcoming_at(timestamp: Timestamp, now: Timestamp) -> bool {
    timestamp > now
}

/// Coarse label relative to the current instant: "In 2 days", "Starting soon"...
pub fn relative_time(timestamp: Timestamp) -> String {
    relative_time_at(timestamp, now_millis())
}

pub fn relative_time_at(timestamp: Timestamp, now: Timestamp) -> String {
    let diff = timestamp.saturating_sub(now);

    if diff <= 0 {
        return "Past event".to_string();
    }

    let days = diff / MS_PER_DAY;
    let hours = (diff % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (diff % MS_PER_HOUR) / MS_PER_MINUTE;

    if days > 0 {
        format!("In {} {}", days, plural(days, "day"))
    } else if hours > 0 {
        format!("In {} {}", hours, plural(hours, "hour"))
    } else if minutes > 0 {
        format!("In {} {}", minutes, plural(minutes, "minute"))
    } else {
        "Starting soon".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

/// Parse a `datetime-local` value ("2026-05-01T14:30") as local time
pub fn convert_to_timestamp(value: &str) -> Result<Timestamp, DateError> {
    convert_to_timestamp_in(value, &Local)
}

pub fn convert_to_timestamp_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<Timestamp, DateError> {
    let value = value.trim();
    let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, INPUT_FORMAT_SECONDS))
        .map_err(|_| DateError::Parse(value.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
        // Repeated hour at a DST fall-back: take the earlier instant
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(DateError::NonexistentLocalTime(value.to_string())),
    }
}

/// Format a timestamp back into a `datetime-local` value
pub fn to_input_value_in<Tz: TimeZone>(timestamp: Timestamp, tz: &Tz) -> Result<String, DateError>
where
    Tz::Offset: std::fmt::Display,
{
    to_datetime(timestamp, tz)
        .map(|dt| dt.format(INPUT_FORMAT).to_string())
        .ok_or(DateError::OutOfRange(timestamp))
}

/// Value for the `min` attribute of the start-time control
pub fn min_start_input(now: Timestamp) -> Result<String, DateError> {
    let earliest = now + MIN_START_OFFSET_MINUTES * MS_PER_MINUTE;
    to_input_value_in(earliest, &Local)
}
