//! Relative ages ("3 minutes ago")

use chrono::{DateTime, NaiveDateTime, Utc};

/// Placeholder shown for a missing or unreadable timestamp
pub const NO_AGE: &str = "-";

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.contains('T') {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    } else {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|t| t.and_utc())
    }
}

fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

/// Human duration for a number of seconds, e.g. `an hour`, `5 days`
fn humanize(seconds: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    let unit = |count: i64, one: &str, many: &str| {
        if count <= 1 {
            one.to_string()
        } else {
            format!("{} {}", count, many)
        }
    };

    if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if seconds < 45 * MINUTE {
        unit(round_div(seconds, MINUTE), "a minute", "minutes")
    } else if seconds < 90 * MINUTE {
        "an hour".to_string()
    } else if seconds < 22 * HOUR {
        unit(round_div(seconds, HOUR), "an hour", "hours")
    } else if seconds < 36 * HOUR {
        "a day".to_string()
    } else if seconds < 26 * DAY {
        unit(round_div(seconds, DAY), "a day", "days")
    } else if seconds < 45 * DAY {
        "a month".to_string()
    } else if seconds < 320 * DAY {
        // 30.4 days per month
        unit(round_div(seconds * 10, DAY * 304), "a month", "months")
    } else if seconds < 548 * DAY {
        "a year".to_string()
    } else {
        unit(round_div(seconds, DAY * 365), "a year", "years")
    }
}

/// Age of `value` relative to `now`; `-` when missing or unparseable
pub fn get_age(value: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(then) = value.filter(|v| !v.is_empty()).and_then(parse_timestamp) else {
        return NO_AGE.to_string();
    };
    let seconds = (now - then).num_seconds();
    if seconds >= 0 {
        format!("{} ago", humanize(seconds))
    } else {
        format!("in {}", humanize(-seconds))
    }
}
