//! Calendar date parsing and rendering for the exercise API.
//!
//! Dates are stored as plain calendar dates. Clients send `YYYY-MM-DD` or a
//! full RFC 3339 timestamp; responses always use the short English form
//! `Sun Jan 15 2023`.

use chrono::{DateTime, Local, NaiveDate};

const ISO_DATE: &str = "%Y-%m-%d";
const DISPLAY_DATE: &str = "%a %b %d %Y";

/// Parses a client-supplied date. Returns `None` if the input is not a date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    NaiveDate::parse_from_str(input, ISO_DATE)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

/// The server's current local date, used when an exercise has no date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2023-01-15"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            parse_date("  2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_calendar_date() {
        assert_eq!(
            parse_date("2023-01-15T23:30:00+09:00"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(format_date(date), "Sun Jan 15 2023");

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date(date), "Mon Jan 01 2024");
    }
}
