//! Timestamp parsing and relative-age formatting for dashboard listings.

use chrono::{DateTime, Local, NaiveDateTime};

const UNITS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Parse a backend timestamp.
///
/// Accepts ISO-8601 local date-times with or without fractional seconds
/// and RFC 3339 strings with an offset. Offset timestamps are converted to
/// the local time zone so they compare against `Local::now()`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Render how long ago `then` was relative to `now`, e.g. `"3 hours ago"`.
pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let secs = (now - then).num_seconds();
    for (unit, unit_secs) in UNITS {
        let n = secs / unit_secs;
        if n >= 1 {
            let plural = if n == 1 { "" } else { "s" };
            return format!("{n} {unit}{plural} ago");
        }
    }
    "just now".to_string()
}
