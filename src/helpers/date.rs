//! Date display helpers
//!
//! Post dates stay strings end to end; they are only parsed here, for
//! display. Unparseable dates are shown as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a post date in the common formats (date only, local datetime, RFC 3339)
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Contentful date fields omit seconds: 2024-03-02T10:00+01:00
    if let Ok(dt) = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z"))
    {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a post date with a chrono pattern, falling back to the raw string
pub fn display_date(s: &str, format: &str) -> String {
    match parse_date(s) {
        Some(dt) => dt.format(format).to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date_only() {
        assert_eq!(display_date("2024-01-05", "%B %-d, %Y"), "January 5, 2024");
    }

    #[test]
    fn test_display_rfc3339() {
        assert_eq!(
            display_date("2024-12-31T08:00:00.000Z", "%Y-%m-%d"),
            "2024-12-31"
        );
        assert_eq!(display_date("2024-03-02T10:00+01:00", "%Y-%m-%d"), "2024-03-02");
    }

    #[test]
    fn test_unparseable_date_kept() {
        assert_eq!(display_date("sometime in May", "%Y"), "sometime in May");
        assert_eq!(display_date("", "%Y"), "");
    }
}
