// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard assembly.
//!
//! Handles the core workflow:
//! 1. Validate and flatten the raw feed
//! 2. Aggregate per athlete and per team (daily cap applied)
//! 3. Rank both collections by the requested metric
//! 4. Optionally reconcile the result against a member roster

use serde_json::Value;

use crate::models::{
    Aggregation, AthleteStanding, ChallengeSummary, Leaderboard, MemberBoard, MemberStanding,
    Metric, MemberSet, RosterMember, TeamStanding, NO_TEAM,
};
use crate::services::aggregator::aggregate;
use crate::services::feed::{parse_activity_feed, parse_roster, FeedError};
use crate::services::identity::{match_activity_to_member, resolve_member_name};
use crate::services::ranker::rank;

/// Rank an aggregation into athlete and team leaderboards.
pub fn build_leaderboard(aggregation: &Aggregation, metric: Metric) -> Leaderboard {
    let athletes = rank(aggregation.athletes.values(), metric)
        .into_iter()
        .map(|entry| entry.map(AthleteStanding::from))
        .collect();
    let teams = rank(aggregation.teams.values(), metric)
        .into_iter()
        .map(|entry| entry.map(TeamStanding::from))
        .collect();

    Leaderboard {
        metric,
        summary: ChallengeSummary::from(aggregation),
        athletes,
        teams,
    }
}

/// Build a roster-driven leaderboard: exactly one row per roster entry.
pub fn build_member_board(
    roster: &[RosterMember],
    aggregation: &Aggregation,
    metric: Metric,
) -> MemberBoard {
    let mut matched = MemberSet::default();

    let standings: Vec<MemberStanding> = roster
        .iter()
        .map(|member| {
            let identity = match_activity_to_member(Some(&member.as_athlete_ref()), member, |n| {
                aggregation.athletes.contains_key(n)
            });
            let aggregate = identity
                .as_deref()
                .and_then(|id| aggregation.athletes.get(id));

            let name = resolve_member_name(member);
            match &identity {
                Some(id) => {
                    matched.insert(id);
                }
                None => tracing::debug!(member = %name, "No activity matched roster member"),
            }

            let team = member
                .team
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| aggregate.map(|a| a.team.clone()))
                .unwrap_or_else(|| NO_TEAM.to_string());

            MemberStanding::new(name, team, aggregate)
        })
        .collect();

    let unmatched_athletes = aggregation
        .athletes
        .keys()
        .filter(|name| !matched.contains(name))
        .cloned()
        .collect();

    MemberBoard {
        metric,
        members: rank(standings, metric),
        unmatched_athletes,
    }
}

/// Parse, aggregate and rank a raw activity feed.
pub fn leaderboard_from_feed(feed: &Value, metric: Metric) -> Result<Leaderboard, FeedError> {
    let records = parse_activity_feed(feed)?;
    let aggregation = aggregate(&records);
    Ok(build_leaderboard(&aggregation, metric))
}

/// Parse both inputs, aggregate, and build the roster-driven leaderboard.
pub fn member_board_from_feed(
    roster: &Value,
    feed: &Value,
    metric: Metric,
) -> Result<MemberBoard, FeedError> {
    let roster = parse_roster(roster)?;
    let records = parse_activity_feed(feed)?;
    let aggregation = aggregate(&records);
    Ok(build_member_board(&roster, &aggregation, metric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed() -> Value {
        json!([
            { "athlete": { "firstname": "Ana", "lastname": "Lee", "team": "Ducks" }, "distance": 12000, "date": "2025-09-01" },
            { "athlete": { "firstname": "Bo", "lastname": "Kim", "team": "Geese" }, "distance": 11000, "date": "2025-09-01" },
            { "athlete": { "firstname": "Cy", "lastname": "Park", "team": "Ducks" }, "distance": 3000, "date": "2025-09-02" }
        ])
    }

    #[test]
    fn test_leaderboard_capped_vs_raw() {
        let capped = leaderboard_from_feed(&feed(), Metric::Capped).unwrap();
        let names: Vec<&str> = capped.athletes.iter().map(|e| e.entry.name.as_str()).collect();
        // Ana and Bo both cap at 10km; Ana was seen first.
        assert_eq!(names, vec!["Ana Lee", "Bo Kim", "Cy Park"]);
        assert_eq!(capped.teams[0].entry.name, "Ducks");
        assert_eq!(capped.teams[0].entry.capped_distance_meters, 13000.0);
        assert_eq!(capped.summary.total_activities, 3);
        assert_eq!(capped.summary.total_teams, 2);

        let raw = leaderboard_from_feed(&feed(), Metric::Raw).unwrap();
        assert_eq!(raw.athletes[0].entry.name, "Ana Lee");
        assert_eq!(raw.athletes[1].entry.name, "Bo Kim");
        assert_eq!(raw.metric, Metric::Raw);
    }

    #[test]
    fn test_invalid_feed_fails_whole_run() {
        assert!(leaderboard_from_feed(&json!({ "data": [] }), Metric::Capped).is_err());
    }

    #[test]
    fn test_member_board_one_row_per_roster_entry() {
        let roster = json!([
            { "firstname": "Kim", "lastname": "Bo", "team": "Geese" },
            { "firstname": "Ana", "lastname": "Lee", "webName": "Ana L." },
            { "firstname": "Dee", "lastname": "Ray", "team": "Ducks" }
        ]);
        let board = member_board_from_feed(&roster, &feed(), Metric::Capped).unwrap();

        assert_eq!(board.members.len(), 3);
        let names: Vec<&str> = board.members.iter().map(|e| e.entry.name.as_str()).collect();
        assert_eq!(names, vec!["Kim Bo", "Ana L.", "Dee Ray"]);

        let kim = &board.members[0].entry;
        assert_eq!(kim.matched_identity.as_deref(), Some("Bo Kim"));
        assert_eq!(kim.capped_distance_meters, 10000.0);

        let ana = &board.members[1].entry;
        assert_eq!(ana.matched_identity.as_deref(), Some("Ana Lee"));
        assert_eq!(ana.team, "Ducks");

        let dee = &board.members[2];
        assert_eq!(dee.rank, 3);
        assert!(dee.entry.matched_identity.is_none());
        assert_eq!(dee.entry.activity_count, 0);

        assert_eq!(board.unmatched_athletes, vec!["Cy Park".to_string()]);
    }
}
