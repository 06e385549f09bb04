// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity records and roster members as delivered by the upstream feed.
//!
//! The upstream data is not schema-synchronized with this service, so every
//! field is optional and deserialization is lenient: a field of the wrong
//! JSON type is treated as absent instead of rejecting the record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Team name used when an activity's athlete has no team.
pub const NO_TEAM: &str = "No Team";

/// Placeholder for a missing name part in an activity-derived identity.
pub const MISSING_NAME_PART: &str = "undefined";

/// One logged walk/run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityRecord {
    /// Athlete who logged the activity
    #[serde(default, deserialize_with = "lenient_athlete")]
    pub athlete: Option<AthleteRef>,
    /// Activity title
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Sport type (Walk, Run, Hike, etc.)
    #[serde(
        rename = "type",
        alias = "sport_type",
        default,
        deserialize_with = "lenient_string"
    )]
    pub sport_type: Option<String>,
    /// Distance in meters
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    /// Moving time in seconds
    #[serde(default, deserialize_with = "lenient_f64")]
    pub moving_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_committed: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_fetch: Option<String>,
    /// Legacy "MMDD" day field
    #[serde(default, deserialize_with = "lenient_string")]
    pub daymonth: Option<String>,
}

impl ActivityRecord {
    /// The timestamp field used for day bucketing: the first non-empty of
    /// `date`, `date_committed`, `date_fetch`, `daymonth`.
    pub fn date_field(&self) -> Option<&str> {
        [
            &self.date,
            &self.date_committed,
            &self.date_fetch,
            &self.daymonth,
        ]
        .into_iter()
        .filter_map(|f| Option::as_deref(f))
        .find(|s| !s.is_empty())
    }

    /// Team name, defaulting to [`NO_TEAM`].
    pub fn team_name(&self) -> &str {
        self.athlete
            .as_ref()
            .and_then(|a| a.team.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TEAM)
    }
}

/// Athlete fields embedded in an activity record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AthleteRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lastname: Option<String>,
    /// Explicit display name, when the feed carries one
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, rename = "webName", deserialize_with = "lenient_string")]
    pub web_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub athlete_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team: Option<String>,
}

impl AthleteRef {
    /// First non-empty of `display_name`, `webName`, `athlete_name`.
    pub fn preferred_name(&self) -> Option<&str> {
        first_non_empty(&[&self.display_name, &self.web_name, &self.athlete_name])
    }
}

/// A known member from the roster source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterMember {
    #[serde(default, deserialize_with = "lenient_string")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lastname: Option<String>,
    #[serde(default, rename = "webName", deserialize_with = "lenient_string")]
    pub web_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team: Option<String>,
}

impl RosterMember {
    /// First non-empty of `webName`, `display_name`.
    pub fn preferred_name(&self) -> Option<&str> {
        first_non_empty(&[&self.web_name, &self.display_name])
    }

    /// View this member as the athlete block of an activity record.
    pub fn as_athlete_ref(&self) -> AthleteRef {
        AthleteRef {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            display_name: self.preferred_name().map(String::from),
            team: self.team.clone(),
            ..Default::default()
        }
    }
}

/// Header of a grouped feed entry: one athlete with their activities.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AthleteGroupHeader {
    #[serde(default, deserialize_with = "lenient_string")]
    pub athlete_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_athlete<'de, D>(deserializer: D) -> Result<Option<AthleteRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => match AthleteRef::deserialize(value) {
            Ok(athlete) => Some(athlete),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable athlete block");
                None
            }
        },
        _ => None,
    })
}

fn first_non_empty<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| Option::as_deref(f))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_full_record() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "athlete": { "firstname": "Ana", "lastname": "Lee", "team": "Ducks" },
            "name": "Morning Walk",
            "type": "Walk",
            "distance": 4210.5,
            "moving_time": 2700,
            "date": "2025-09-08T07:15:00Z"
        }))
        .unwrap();

        let athlete = record.athlete.as_ref().unwrap();
        assert_eq!(athlete.firstname.as_deref(), Some("Ana"));
        assert_eq!(record.team_name(), "Ducks");
        assert_eq!(record.sport_type.as_deref(), Some("Walk"));
        assert_eq!(record.distance, Some(4210.5));
        assert_eq!(record.moving_time, Some(2700.0));
        assert_eq!(record.date_field(), Some("2025-09-08T07:15:00Z"));
    }

    #[test]
    fn test_mismatched_types_become_absent() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "athlete": "not an object",
            "distance": { "value": 3 },
            "date": ["2025-09-08"]
        }))
        .unwrap();

        assert!(record.athlete.is_none());
        assert!(record.distance.is_none());
        assert!(record.date_field().is_none());
        assert_eq!(record.team_name(), NO_TEAM);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let record: ActivityRecord =
            serde_json::from_value(json!({ "distance": " 1500.25 ", "daymonth": 908 })).unwrap();
        assert_eq!(record.distance, Some(1500.25));
        assert_eq!(record.daymonth.as_deref(), Some("908"));
    }

    #[test]
    fn test_date_field_priority_skips_empty() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "date": "",
            "date_committed": "Monday, 8 September, 2025 - 10:30",
            "date_fetch": "2025-09-01"
        }))
        .unwrap();
        assert_eq!(
            record.date_field(),
            Some("Monday, 8 September, 2025 - 10:30")
        );
    }

    #[test]
    fn test_empty_team_defaults() {
        let record: ActivityRecord =
            serde_json::from_value(json!({ "athlete": { "team": "" } })).unwrap();
        assert_eq!(record.team_name(), NO_TEAM);
    }

    #[test]
    fn test_roster_member_web_name() {
        let member: RosterMember = serde_json::from_value(json!({
            "firstname": "Ana",
            "lastname": "Lee",
            "webName": "Ana L.",
            "team": "Ducks"
        }))
        .unwrap();
        assert_eq!(member.web_name.as_deref(), Some("Ana L."));
        assert_eq!(
            member.as_athlete_ref().display_name.as_deref(),
            Some("Ana L.")
        );
    }

    #[test]
    fn test_athlete_with_several_name_keys() {
        let record: ActivityRecord = serde_json::from_value(json!({
            "athlete": {
                "firstname": "Ana",
                "lastname": "Lee",
                "team": "Ducks",
                "display_name": "",
                "webName": "Ana L.",
                "athlete_name": "Ana Lee"
            },
            "distance": 4000
        }))
        .unwrap();

        let athlete = record.athlete.as_ref().unwrap();
        assert_eq!(athlete.preferred_name(), Some("Ana L."));
        assert_eq!(athlete.firstname.as_deref(), Some("Ana"));
        assert_eq!(record.team_name(), "Ducks");
    }

    #[test]
    fn test_roster_member_with_both_name_keys() {
        let member: RosterMember = serde_json::from_value(json!({
            "webName": "  ",
            "display_name": "Ana L.",
            "team": "Ducks"
        }))
        .unwrap();
        assert_eq!(member.preferred_name(), Some("Ana L."));
    }
}
