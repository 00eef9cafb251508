// Utility functions
use chrono::{DateTime, Utc};

/// Converts an RFC 3339 string into `DateTime<Utc>`, if possible.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Joins whitespace-separated words with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims a value and drops it when nothing is left.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_in_any_offset() {
        let dt = parse_datetime("2025-03-01T12:00:00-05:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T17:00:00+00:00");
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(collapse_whitespace("  Joe's \t Stone\n Crab "), "Joe's Stone Crab");
    }

    #[test]
    fn blank_values_become_none() {
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(Some(" 305-555-0100 ".into())), Some("305-555-0100".into()));
    }
}
