//! Date and timestamp formats shared by the backend and table clients.
//!
//! Entries carry a calendar `date` and a `when_input` timestamp. Clients send
//! timestamps in a handful of shapes (`datetime-local` inputs drop the
//! seconds, scripts send RFC 3339), so parsing is lenient while formatting
//! always produces one canonical shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Canonical wire format for `Entry::date`
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical wire format for `Entry::when_input`
pub const WHEN_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an entry date (YYYY-MM-DD)
pub fn parse_entry_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ENTRY_DATE_FORMAT).ok()
}

/// Parse a `when_input` timestamp.
///
/// RFC 3339 values are converted to UTC; naive values are taken as-is.
pub fn parse_when_input(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub fn format_entry_date(date: NaiveDate) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}

pub fn format_when_input(timestamp: NaiveDateTime) -> String {
    timestamp.format(WHEN_INPUT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_when_input_accepts_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(parse_when_input("2024-02-15T10:30:00"), Some(expected));
        assert_eq!(parse_when_input("2024-02-15T10:30"), Some(expected));
        assert_eq!(parse_when_input("2024-02-15 10:30:00"), Some(expected));
        assert_eq!(parse_when_input("2024-02-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_when_input("2024-02-15T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_when_input("not a timestamp"), None);
    }

    #[test]
    fn test_format_when_input_omits_zero_fraction() {
        let ts = parse_when_input("2024-02-15T10:30").unwrap();
        assert_eq!(format_when_input(ts), "2024-02-15T10:30:00");

        let with_millis = parse_when_input("2024-02-15T10:30:00.250").unwrap();
        assert_eq!(format_when_input(with_millis), "2024-02-15T10:30:00.250");
    }

    #[test]
    fn test_parse_entry_date() {
        assert_eq!(
            parse_entry_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_entry_date("05/03/2024"), None);
    }
}
