//! Date normalization.
//!
//! Turns loosely formatted date text into a UTC calendar date. Anything that
//! cannot be read as a real date becomes `None`; one bad cell never aborts
//! a load.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Date-only layouts tried after the timestamp forms.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%a %B %d %Y",
    "%a, %B %d, %Y",
];

/// Minute-precision ISO timestamps with an explicit offset, which RFC 3339
/// rejects for lacking seconds.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

/// Offset-free timestamp layouts; the time of day is discarded. A trailing
/// `Z` is UTC and needs no conversion.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// `M/D/YYYY` or `M-D-YYYY`, month first.
fn month_day_year() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").ok())
        .as_ref()
}

/// Normalize a loosely typed cell. Non-strings are unparseable.
pub fn parse_date(input: &Value) -> Option<NaiveDate> {
    match input {
        Value::String(s) => parse_date_str(s),
        _ => None,
    }
}

/// Normalize date text.
///
/// Recognized layouts are tried first; the year/month/day read from them is
/// kept and any time of day or offset is dropped. Failing that, a numeric
/// month/day/year form is accepted.
pub fn parse_date_str(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_textual(trimmed).or_else(|| parse_month_day_year(trimmed))
}

fn parse_textual(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

fn parse_month_day_year(s: &str) -> Option<NaiveDate> {
    let caps = month_day_year()?.captures(s)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date_str("2024-03-15"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("  2024-03-15  "), ymd(2024, 3, 15));
    }

    #[test]
    fn test_us_numeric_date() {
        assert_eq!(parse_date_str("3/15/2024"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("03-15-2024"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("1/2/2024"), ymd(2024, 1, 2));
    }

    #[test]
    fn test_out_of_range_components() {
        // Day-first input with day > 12 is not a valid month.
        assert_eq!(parse_date_str("15/3/2024"), None);
        assert_eq!(parse_date_str("2/30/2024"), None);
        assert_eq!(parse_date_str("2024-02-30"), None);
    }

    #[test]
    fn test_timestamps_drop_time_of_day() {
        assert_eq!(parse_date_str("2024-03-15T23:59:59Z"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15T08:00:00+05:30"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15 10:30:00"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15T10:30:00.250"), ymd(2024, 3, 15));
        assert_eq!(
            parse_date_str("Fri, 15 Mar 2024 10:00:00 +0000"),
            ymd(2024, 3, 15)
        );
    }

    #[test]
    fn test_minute_precision_timestamps() {
        assert_eq!(parse_date_str("2024-03-15T10:30Z"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15T10:30+02:00"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15T23:30-05:00"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-03-15 10:30+01:00"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024-02-30T10:30Z"), None);
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(parse_date_str("March 15, 2024"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("Mar 15 2024"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("15 March 2024"), ymd(2024, 3, 15));
        assert_eq!(parse_date_str("2024/03/15"), ymd(2024, 3, 15));
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(parse_date_str("not-a-date"), None);
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("   "), None);
        assert_eq!(parse_date_str("3/15/24"), None);
        assert_eq!(parse_date_str("tomorrow"), None);
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(parse_date(&json!("2024-03-15")), ymd(2024, 3, 15));
        assert_eq!(parse_date(&json!(45366)), None);
        assert_eq!(parse_date(&json!(null)), None);
        assert_eq!(parse_date(&json!(true)), None);
        assert_eq!(parse_date(&json!(["2024-03-15"])), None);
    }
}
