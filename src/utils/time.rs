//! Time utilities

use chrono::{DateTime, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a datetime string in ISO 8601 format
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Long-form date as printed on certificates and letters
pub fn format_long_date(dt: DateTime<Utc>) -> String {
    dt.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-01-15T12:00:00Z");
        assert!(dt.is_some());

        let invalid = parse_datetime("not a date");
        assert!(invalid.is_none());
    }

    #[test]
    fn test_format_long_date() {
        let dt = parse_datetime("2024-03-05T08:00:00Z").unwrap();
        assert_eq!(format_long_date(dt), "March 05, 2024");
    }
}
