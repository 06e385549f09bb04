// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running aggregates built by a single pass over the activity feed.
//!
//! Each aggregate tracks an uncapped total and a capped total in which an
//! athlete's contribution for any one calendar day is limited to
//! [`DAILY_CAP_METERS`]. Teams cap per member, never per team.

use std::collections::HashSet;

use crate::models::{ActivityRecord, DayKey, OrderedMap};

/// Maximum distance counted toward the capped total per athlete per day.
pub const DAILY_CAP_METERS: f64 = 10_000.0;

/// Result of adding one activity to a [`DailyBucket`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapContribution {
    /// Full distance, added to the uncapped total
    pub raw: f64,
    /// Portion that fit under the day's remaining cap
    pub capped: f64,
}

/// Per-day running distance for one athlete, clamped at the daily cap.
#[derive(Debug, Clone, Default)]
pub struct DailyBucket {
    days: OrderedMap<DayKey, f64>,
}

impl DailyBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `meters` logged on `day`.
    ///
    /// Once a day reaches the cap, later activities that day contribute in
    /// full to `raw` and nothing to `capped`. The per-day capped sum is
    /// `min(sum, cap)` whatever the order activities arrive in.
    pub fn add(&mut self, day: DayKey, meters: f64) -> CapContribution {
        let current = self.days.get_or_insert_with(day, || 0.0);
        let remaining = (DAILY_CAP_METERS - *current).max(0.0);
        let capped = meters.min(remaining);
        *current = (*current + meters).min(DAILY_CAP_METERS);

        CapContribution {
            raw: meters,
            capped,
        }
    }

    /// Number of distinct days seen.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Distinct athlete identities, compared by canonical name.
#[derive(Debug, Clone, Default)]
pub struct MemberSet {
    members: HashSet<String>,
}

impl MemberSet {
    /// Returns `true` if the identity was not already present.
    pub fn insert(&mut self, identity: &str) -> bool {
        self.members.insert(identity.to_string())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.members.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// An activity as counted by an aggregate.
#[derive(Debug, Clone)]
pub struct ContributingActivity {
    pub record: ActivityRecord,
    pub day_key: DayKey,
    /// Sanitized distance actually added to the totals
    pub distance_meters: f64,
}

/// Running totals for one athlete.
#[derive(Debug, Clone)]
pub struct AthleteAggregate {
    pub name: String,
    /// Team of the athlete's first activity
    pub team: String,
    pub activity_count: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub activities: Vec<ContributingActivity>,
    daily: DailyBucket,
}

impl AthleteAggregate {
    pub fn new(name: &str, team: &str) -> Self {
        Self {
            name: name.to_string(),
            team: team.to_string(),
            activity_count: 0,
            total_distance_meters: 0.0,
            capped_distance_meters: 0.0,
            activities: Vec::new(),
            daily: DailyBucket::new(),
        }
    }

    /// Count one activity against this athlete.
    pub fn add(&mut self, activity: ContributingActivity) -> CapContribution {
        let contribution = self
            .daily
            .add(activity.day_key, activity.distance_meters);

        self.activity_count += 1;
        self.total_distance_meters += contribution.raw;
        self.capped_distance_meters += contribution.capped;
        self.activities.push(activity);

        contribution
    }

    /// Longest single activity; ties keep the earliest in input order.
    pub fn best_activity(&self) -> Option<&ContributingActivity> {
        self.activities.iter().fold(None, |best, current| match best {
            Some(b) if current.distance_meters <= b.distance_meters => Some(b),
            _ => Some(current),
        })
    }

    /// Raw meters per activity (0 with no activities).
    pub fn average_distance_meters(&self) -> f64 {
        safe_div(self.total_distance_meters, self.activity_count as f64)
    }

    /// Number of distinct days with activity (`Unknown` counts as one).
    pub fn active_days(&self) -> usize {
        self.daily.len()
    }
}

/// Running totals for one team.
#[derive(Debug, Clone)]
pub struct TeamAggregate {
    pub name: String,
    pub activity_count: u32,
    pub total_distance_meters: f64,
    pub capped_distance_meters: f64,
    pub members: MemberSet,
    pub activities: Vec<ContributingActivity>,
    member_days: OrderedMap<String, DailyBucket>,
}

impl TeamAggregate {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            activity_count: 0,
            total_distance_meters: 0.0,
            capped_distance_meters: 0.0,
            members: MemberSet::default(),
            activities: Vec::new(),
            member_days: OrderedMap::new(),
        }
    }

    /// Count one activity logged by `athlete` against this team.
    ///
    /// The cap is applied to the athlete's own days within the team, so one
    /// member's distance never uses up a teammate's headroom.
    pub fn add(&mut self, athlete: &str, activity: ContributingActivity) -> CapContribution {
        let contribution = self
            .member_days
            .get_or_insert_with(athlete.to_string(), DailyBucket::new)
            .add(activity.day_key, activity.distance_meters);

        self.activity_count += 1;
        self.total_distance_meters += contribution.raw;
        self.capped_distance_meters += contribution.capped;
        self.members.insert(athlete);
        self.activities.push(activity);

        contribution
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Raw meters per activity.
    pub fn average_distance_meters(&self) -> f64 {
        safe_div(self.total_distance_meters, self.activity_count as f64)
    }

    /// Raw meters per distinct member.
    pub fn average_distance_per_member_meters(&self) -> f64 {
        safe_div(self.total_distance_meters, self.member_count() as f64)
    }

    /// Capped meters per distinct member.
    pub fn average_capped_distance_per_member_meters(&self) -> f64 {
        safe_div(self.capped_distance_meters, self.member_count() as f64)
    }

    pub fn activities_per_member(&self) -> f64 {
        safe_div(self.activity_count as f64, self.member_count() as f64)
    }
}

/// Output of one aggregation run, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub athletes: OrderedMap<String, AthleteAggregate>,
    pub teams: OrderedMap<String, TeamAggregate>,
}

/// Division that yields 0 instead of NaN/inf for an empty denominator.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
