//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the client core.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

/// Generate a new request correlation id
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Parse an event date as sent by the backend.
///
/// Accepts RFC 3339, naive datetimes (read as UTC) and plain dates (midnight UTC).
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Case-insensitive substring test; an empty needle always matches
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_event_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_event_date("2025-09-01"), Some(midnight));
        assert_eq!(parse_event_date("2025-09-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_event_date("2025-09-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_event_date("2025-09-01T00:00"), Some(midnight));
        assert_eq!(parse_event_date("2025-09-01T00:00:00.000"), Some(midnight));
    }

    #[test]
    fn test_parse_event_date_rejects_garbage() {
        assert_eq!(parse_event_date(""), None);
        assert_eq!(parse_event_date("tomorrow"), None);
        assert_eq!(parse_event_date("2025-13-45"), None);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Tech Conference", "tech"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Jazz Night", "tech"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
    }
}
