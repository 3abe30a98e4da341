use chrono::{DateTime, NaiveDate, Utc};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// UTC calendar date of a Unix timestamp.
pub fn from_timestamp(ts: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part
/// (`2024-03-01 10:00:00 +0100`, `2024-03-01T10:00:00Z`) and keeps the date.
pub fn leading_date(s: &str) -> Option<String> {
    let s = s.trim();
    let head = s.get(..10)?;
    parse_date(head).map(|d| d.format("%Y-%m-%d").to_string())
}
