//! Date handling for deadlines and creation dates.
//!
//! The remote API is loose about dates: it may send `null`, an empty string,
//! a plain `YYYY-MM-DD` or a full timestamp. Everything is normalised to a
//! `NaiveDate` here. Human input from the form and CLI goes through
//! [`parse_deadline_input`].

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

/// Read an optional date from `null`, `""`, `YYYY-MM-DD` or RFC 3339.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(serde_json::Value::String(s)) => parse_wire_date(&s),
        Some(other) => {
            tracing::warn!(value = %other, "ignoring non-string date from server");
            None
        }
    })
}

/// Write an optional date as `YYYY-MM-DD` or `null`.
pub fn serialize_plain<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_none(),
    }
}

fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    tracing::warn!(value = s, "ignoring unparseable date from server");
    None
}

/// Parse human-readable deadline input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - weekday names ("friday", "next monday")
/// - "YYYY-MM-DD"
pub fn parse_deadline_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
    }

    let (name, skip_week) = match s.strip_prefix("next ") {
        Some(rest) => (rest, true),
        None => (s.as_str(), false),
    };
    if let Some(target) = weekday_number(name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let mut ahead = (target + 7 - current) % 7;
        if skip_week {
            ahead += 7;
        }
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_number(name: &str) -> Option<i64> {
    let n = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(n)
}

/// Format a deadline relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_deadline_relative(deadline: Option<NaiveDate>, today: NaiveDate) -> String {
    match deadline {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}
