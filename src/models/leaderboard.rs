// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranked leaderboard entries handed to the rendering layer.
//!
//! Distances stay in full-precision meters. The `_km` fields are plain unit
//! conversions; rounding for display is left to the consumer.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::stats::{safe_div, Aggregation, AthleteAggregate, ContributingActivity, TeamAggregate};
use crate::models::{DayKey, OrderedMap};

/// Which total a leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Daily-capped distance (the official ranking)
    #[default]
    Capped,
    /// Uncapped total distance
    Raw,
}

/// An entity with its 1-based leaderboard position.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry<T> {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: T,
}

impl<T> LeaderboardEntry<T> {
    /// Convert the wrapped entity, keeping the rank.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LeaderboardEntry<U> {
        LeaderboardEntry {
            rank: self.rank,
            entry: f(self.entry),
        }
    }
}

/// Engagement bucket by activity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
}

impl ActivityLevel {
    pub fn from_count(activity_count: u32) -> Self {
        match activity_count {
            10.. => ActivityLevel::High,
            5..=9 => ActivityLevel::Medium,
            _ => ActivityLevel::Low,
        }
    }
}

/// A single activity for display.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub distance_meters: f64,
    pub moving_time_seconds: Option<f64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub day_key: DayKey,
    pub formatted_date: String,
}

impl From<&ContributingActivity> for ActivitySummary {
    fn from(activity: &ContributingActivity) -> Self {
        Self {
            name: activity.record.name.clone(),
            sport_type: activity.record.sport_type.clone(),
            distance_meters: activity.distance_meters,
            moving_time_seconds: activity.record.moving_time,
            day_key: activity.day_key,
            formatted_date: activity.day_key.formatted_date(),
        }
    }
}

/// Uncapped activity totals for one day of one athlete.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DaySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub day_key: DayKey,
    pub formatted_date: String,
    pub activity_count: u32,
    pub distance_meters: f64,
    pub average_distance_meters: f64,
}

/// Per-day breakdown, longest day first (ties keep first-seen order).
pub fn day_breakdown(activities: &[ContributingActivity]) -> Vec<DaySummary> {
    let mut days: OrderedMap<DayKey, (u32, f64)> = OrderedMap::new();
    for activity in activities {
        let totals = days.get_or_insert_with(activity.day_key, || (0, 0.0));
        totals.0 += 1;
        totals.1 += activity.distance_meters;
    }

    let mut summaries: Vec<DaySummary> = days
        .iter()
        .map(|(day_key, &(count, meters))| DaySummary {
            day_key: *day_key,
            formatted_date: day_key.formatted_date(),
            activity_count: count,
            distance_meters: meters,
            average_distance_meters: safe_div(meters, count as f64),
        })
        .collect();
    summaries.sort_by(|a, b| b.distance_meters.total_cmp(&a.distance_meters));
    summaries
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Leaderboard row for an athlete.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AthleteStanding {
    pub name: String,
    pub team: String,
    pub activity_count: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub total_distance_km: f64,
    pub capped_distance_km: f64,
    pub average_distance_meters: f64,
    pub best_activity: Option<ActivitySummary>,
    pub active_days: u32,
    pub activity_level: ActivityLevel,
    pub days: Vec<DaySummary>,
}

impl From<&AthleteAggregate> for AthleteStanding {
    fn from(athlete: &AthleteAggregate) -> Self {
        Self {
            name: athlete.name.clone(),
            team: athlete.team.clone(),
            activity_count: athlete.activity_count,
            total_distance_meters: athlete.total_distance_meters,
            capped_distance_meters: athlete.capped_distance_meters,
            total_distance_km: meters_to_km(athlete.total_distance_meters),
            capped_distance_km: meters_to_km(athlete.capped_distance_meters),
            average_distance_meters: athlete.average_distance_meters(),
            best_activity: athlete.best_activity().map(ActivitySummary::from),
            active_days: athlete.active_days() as u32,
            activity_level: ActivityLevel::from_count(athlete.activity_count),
            days: day_breakdown(&athlete.activities),
        }
    }
}

/// Leaderboard row for a team.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamStanding {
    pub name: String,
    pub activity_count: u32,
    pub member_count: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub total_distance_km: f64,
    pub capped_distance_km: f64,
    pub average_distance_meters: f64,
    pub average_distance_per_member_meters: f64,
    pub average_capped_distance_per_member_meters: f64,
    pub activities_per_member: f64,
}

impl From<&TeamAggregate> for TeamStanding {
    fn from(team: &TeamAggregate) -> Self {
        Self {
            name: team.name.clone(),
            activity_count: team.activity_count,
            member_count: team.member_count() as u32,
            total_distance_meters: team.total_distance_meters,
            capped_distance_meters: team.capped_distance_meters,
            total_distance_km: meters_to_km(team.total_distance_meters),
            capped_distance_km: meters_to_km(team.capped_distance_meters),
            average_distance_meters: team.average_distance_meters(),
            average_distance_per_member_meters: team.average_distance_per_member_meters(),
            average_capped_distance_per_member_meters: team
                .average_capped_distance_per_member_meters(),
            activities_per_member: team.activities_per_member(),
        }
    }
}

/// Roster-driven row: one per roster entry, matched or not.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberStanding {
    pub name: String,
    pub team: String,
    /// Activity identity this member was matched to; `None` on a miss
    pub matched_identity: Option<String>,
    pub activity_count: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub total_distance_km: f64,
    pub capped_distance_km: f64,
    pub average_distance_meters: f64,
    pub activity_level: ActivityLevel,
}

impl MemberStanding {
    /// Build a row from the member's resolved name/team and its matched
    /// aggregate. A missing aggregate yields an all-zero row.
    pub fn new(name: String, team: String, matched: Option<&AthleteAggregate>) -> Self {
        let (count, total, capped, average) = matched
            .map(|a| {
                (
                    a.activity_count,
                    a.total_distance_meters,
                    a.capped_distance_meters,
                    a.average_distance_meters(),
                )
            })
            .unwrap_or((0, 0.0, 0.0, 0.0));

        Self {
            name,
            team,
            matched_identity: matched.map(|a| a.name.clone()),
            activity_count: count,
            total_distance_meters: total,
            capped_distance_meters: capped,
            total_distance_km: meters_to_km(total),
            capped_distance_km: meters_to_km(capped),
            average_distance_meters: average,
            activity_level: ActivityLevel::from_count(count),
        }
    }
}

/// Challenge-wide totals.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChallengeSummary {
    pub total_activities: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub total_athletes: u32,
    pub total_teams: u32,
    pub average_distance_per_athlete_meters: f64,
}

impl From<&Aggregation> for ChallengeSummary {
    fn from(aggregation: &Aggregation) -> Self {
        let (activities, total, capped) = aggregation.athletes.values().fold(
            (0u32, 0.0f64, 0.0f64),
            |(count, total, capped), a| {
                (
                    count + a.activity_count,
                    total + a.total_distance_meters,
                    capped + a.capped_distance_meters,
                )
            },
        );
        let athletes = aggregation.athletes.len();

        Self {
            total_activities: activities,
            total_distance_meters: total,
            capped_distance_meters: capped,
            total_athletes: athletes as u32,
            total_teams: aggregation.teams.len() as u32,
            average_distance_per_athlete_meters: safe_div(total, athletes as f64),
        }
    }
}

/// Both ranked leaderboards for one aggregation run.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Leaderboard {
    pub metric: Metric,
    pub summary: ChallengeSummary,
    pub athletes: Vec<LeaderboardEntry<AthleteStanding>>,
    pub teams: Vec<LeaderboardEntry<TeamStanding>>,
}

/// Roster-driven leaderboard.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberBoard {
    pub metric: Metric,
    pub members: Vec<LeaderboardEntry<MemberStanding>>,
    /// Aggregated athletes that no roster entry matched
    pub unmatched_athletes: Vec<String>,
}
