//! ISO-8601 date handling
//!
//! Dates are persisted as text with millisecond precision in UTC:
//!
//! ```text
//! 2017-01-01T00:00:00.000Z
//! ```
//!
//! Sub-millisecond precision is dropped on the way in, so a date read back
//! equals the original truncated to the millisecond.
//!
//! Years outside 0000-9999 carry a sign and may have more than four digits
//! (`+10000-01-01T00:00:00.000Z`, `-0001-01-01T00:00:00.000Z`). RFC 3339
//! has no such form, so those are parsed with the expanded-year layout.

use chrono::{DateTime, NaiveDateTime, Utc};

/// chrono format string for the canonical date representation.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a date in the canonical form. Truncates, never rounds.
pub fn format_iso8601(date: &DateTime<Utc>) -> String {
    date.format(ISO8601_FORMAT).to_string()
}

/// Layout accepted for expanded (signed) years. Always UTC.
const EXPANDED_YEAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses ISO-8601 / RFC 3339 text into a UTC date.
///
/// Any offset is accepted and normalized to UTC. Everything
/// [`format_iso8601`] produces parses back. Returns `None` for text that is
/// not a date.
pub fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if !text.starts_with(&['+', '-'][..]) {
        return None;
    }
    NaiveDateTime::parse_from_str(text, EXPANDED_YEAR_FORMAT)
        .ok()
        .map(|date| date.and_utc())
}

/// Drops everything below the millisecond.
pub fn truncate_to_millis(date: &DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis()).unwrap_or(*date)
}
