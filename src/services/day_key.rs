// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timestamp normalization into calendar-day keys.
//!
//! Upstream timestamps arrive in several shapes: RFC 3339, RFC 2822, ISO-ish
//! naive date-times, JavaScript `Date#toString` output, and a long form like
//! `"Monday, 8 September, 2025 - 10:30"`. Anything that does not parse maps
//! to `None`; callers fall back to [`DayKey::Unknown`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::models::{ActivityRecord, DayKey, NormalizedDate};

/// Offset-bearing formats not covered by RFC 3339 / RFC 2822.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    // Date#toString: "Mon Sep 08 2025 10:30:00 GMT+0700"
    "%a %b %d %Y %H:%M:%S GMT%z",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d %B, %Y %H:%M:%S",
    "%d %B, %Y %H:%M",
    "%d %B, %Y %I:%M %p",
    "%d %B, %Y %I:%M%p",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%d %B %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%a %b %d %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B, %Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%a %b %d %Y",
];

/// Normalize a raw timestamp into a day key and `"MM/DD"` label.
///
/// Returns `None` for missing, empty or unparsable input. Never panics.
pub fn normalize(raw: Option<&str>) -> Option<NormalizedDate> {
    let cleaned = clean(raw?);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(key) = parse_legacy_day_month(&cleaned) {
        return Some(key.into());
    }

    let rewritten = cleaned.replacen(" - ", " ", 1);
    let date = parse_calendar_date(&rewritten)?;
    DayKey::new(date.month(), date.day()).map(NormalizedDate::from)
}

/// Day key for an activity, falling back to [`DayKey::Unknown`].
pub fn day_key_for(record: &ActivityRecord) -> DayKey {
    let field = record.date_field();
    match normalize(field) {
        Some(normalized) => normalized.day_key,
        None => {
            if let Some(raw) = field {
                tracing::warn!(date = raw, "Unparsable activity date, using Unknown day");
            }
            DayKey::Unknown
        }
    }
}

/// Collapse embedded newlines and runs of whitespace.
fn clean(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A bare "MMDD" value, as carried by the legacy `daymonth` field.
fn parse_legacy_day_month(s: &str) -> Option<DayKey> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = s[..2].parse().ok()?;
    let day: u32 = s[2..].parse().ok()?;
    // Leap year so that "0229" is accepted.
    NaiveDate::from_ymd_opt(2000, month, day)?;
    DayKey::new(month, day)
}

/// Calendar date of a timestamp. Offset-bearing values keep the date in
/// their own offset.
fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = strip_zone_name(s);
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }

    let s = strip_weekday(s);
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

/// Drop a trailing `" (Indochina Time)"`-style zone name.
fn strip_zone_name(s: &str) -> &str {
    s.strip_suffix(')')
        .and_then(|t| t.rsplit_once(" ("))
        .map_or(s, |(head, _)| head)
}

/// Drop a leading `"Monday, "`-style token. The weekday is not checked
/// against the date.
fn strip_weekday(s: &str) -> &str {
    match s.split_once(", ") {
        Some((head, rest)) if head.parse::<Weekday>().is_ok() => rest,
        _ => s,
    }
}
