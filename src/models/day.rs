// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar-day keys used to bucket activities.

use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical identifier for a calendar day.
///
/// The year is intentionally not part of the key: activity on the same
/// month/day of different years lands in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    Day { month: u8, day: u8 },
    Unknown,
}

impl DayKey {
    /// Build a key from a month (1-12) and day of month (1-31).
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(DayKey::Day {
                month: month as u8,
                day: day as u8,
            })
        } else {
            None
        }
    }

    /// "MM/DD", or "Unknown".
    pub fn formatted_date(&self) -> String {
        match self {
            DayKey::Day { month, day } => format!("{:02}/{:02}", month, day),
            DayKey::Unknown => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Day { month, day } => write!(f, "{:02}{:02}", month, day),
            DayKey::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Successful result of normalizing a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    pub day_key: DayKey,
    /// "MM/DD"
    pub formatted_date: String,
}

impl From<DayKey> for NormalizedDate {
    fn from(day_key: DayKey) -> Self {
        Self {
            formatted_date: day_key.formatted_date(),
            day_key,
        }
    }
}
