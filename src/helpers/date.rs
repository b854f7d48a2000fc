//! Date helper functions
//!
//! Posts carry their publish date as `dd MM yyyy h a` (for example
//! `15 06 2023 4 PM`). The format has no minutes, so they are pinned to zero.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ContentError, Result};

/// Front-matter format of the `published` field
pub const PUBLISHED_FORMAT: &str = "%d %m %Y %I %p";

lazy_static! {
    /// Two-digit day and month, four-digit year, then a one or two digit hour
    static ref PUBLISHED_SHAPE: Regex =
        Regex::new(r"^[0-9]{2} [0-9]{2} [0-9]{4} [0-9]{1,2} (?:AM|PM|am|pm)$")
            .expect("valid published date regex");
}

/// Parse a `published` front-matter value
///
/// # Examples
/// ```ignore
/// parse_published("15 06 2023 4 PM") // -> 2023-06-15T16:00:00
/// ```
pub fn parse_published(value: &str) -> Result<NaiveDateTime> {
    let invalid = |message: String| ContentError::InvalidDate {
        value: value.to_string(),
        message,
    };

    let trimmed = value.trim();
    if !PUBLISHED_SHAPE.is_match(trimmed) {
        return Err(invalid("expected `dd MM yyyy h a`".to_string()));
    }

    let mut parsed = Parsed::new();
    parse(&mut parsed, trimmed, StrftimeItems::new(PUBLISHED_FORMAT))
        .map_err(|e| invalid(e.to_string()))?;
    parsed.set_minute(0).map_err(|e| invalid(e.to_string()))?;

    let date = parsed.to_naive_date().map_err(|e| invalid(e.to_string()))?;
    let time = parsed.to_naive_time().map_err(|e| invalid(e.to_string()))?;

    Ok(date.and_time(time))
}

/// Format a publish date for display, like `15 Jun, 2023`
///
/// The day is not zero-padded and month names are always English.
pub fn format_date(published: &NaiveDateTime) -> String {
    published.format("%-d %b, %Y").to_string()
}

/// Render a date back into the front-matter `published` format
pub fn published_string(date: &NaiveDateTime) -> String {
    date.format("%d %m %Y %-I %p").to_string()
}

/// Format a date in ISO 8601 for `datetime` attributes
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_published() {
        let dt = parse_published("15 06 2023 4 PM").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 6, 15));
        assert_eq!((dt.hour(), dt.minute()), (16, 0));

        let dt = parse_published("01 01 2024 9 AM").unwrap();
        assert_eq!(dt.hour(), 9);

        let dt = parse_published("20 03 2024 12 AM").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_published_rejects_other_formats() {
        assert!(parse_published("2023-06-15").is_err());
        assert!(parse_published("15 13 2023 4 PM").is_err());
        assert!(parse_published("15 06 2023 4").is_err());
        assert!(parse_published("").is_err());
    }

    #[test]
    fn test_format_date() {
        let dt = parse_published("15 06 2023 4 PM").unwrap();
        assert_eq!(format_date(&dt), "15 Jun, 2023");

        let dt = parse_published("01 01 2024 9 AM").unwrap();
        assert_eq!(format_date(&dt), "1 Jan, 2024");
    }

    #[test]
    fn test_published_string_reparses() {
        let dt = parse_published("05 11 2022 11 PM").unwrap();
        assert_eq!(published_string(&dt), "05 11 2022 11 PM");
        assert_eq!(parse_published(&published_string(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_published_requires_padded_fields() {
        assert!(parse_published("1 6 2023 4 PM").is_err());
        assert!(parse_published("15062023 4PM").is_err());
        assert!(parse_published("15 06 23 4 PM").is_err());
        assert!(parse_published("15 06 2023 004 PM").is_err());
        assert!(parse_published(" 15 06 2023 4 PM ").is_ok());
    }
}
