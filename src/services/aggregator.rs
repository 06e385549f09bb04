// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-pass aggregation of activity records into athlete and team totals.
//!
//! The pass is pure and synchronous. Every call builds its own
//! [`Aggregation`]; nothing is shared between runs.

use crate::models::stats::ContributingActivity;
use crate::models::{ActivityRecord, Aggregation, AthleteAggregate, TeamAggregate};
use crate::services::day_key::day_key_for;
use crate::services::identity::athlete_identity;

/// Aggregate records in input order.
///
/// Input order only affects which aggregates are created first (used for
/// rank tie-breaking); the totals are the same for any permutation.
pub fn aggregate(records: &[ActivityRecord]) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for record in records {
        let identity = athlete_identity(record.athlete.as_ref());
        let team = record.team_name();
        let activity = ContributingActivity {
            record: record.clone(),
            day_key: day_key_for(record),
            distance_meters: sanitize_distance(record.distance),
        };

        aggregation
            .athletes
            .get_or_insert_with(identity.clone(), || AthleteAggregate::new(&identity, team))
            .add(activity.clone());

        aggregation
            .teams
            .get_or_insert_with(team.to_string(), || TeamAggregate::new(team))
            .add(&identity, activity);
    }

    tracing::debug!(
        records = records.len(),
        athletes = aggregation.athletes.len(),
        teams = aggregation.teams.len(),
        "Aggregated activity records"
    );

    aggregation
}

/// Missing distance counts as 0. Negative or non-finite values are outside
/// the upstream contract and are also counted as 0.
fn sanitize_distance(distance: Option<f64>) -> f64 {
    match distance {
        Some(d) if d.is_finite() && d >= 0.0 => d,
        Some(d) => {
            tracing::warn!(distance = d, "Ignoring invalid activity distance");
            0.0
        }
        None => 0.0,
    }
}
