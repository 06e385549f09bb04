// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod day;
pub mod leaderboard;
pub mod ordered_map;
pub mod stats;

pub use activity::{ActivityRecord, AthleteRef, RosterMember, NO_TEAM};
pub use day::{DayKey, NormalizedDate};
pub use leaderboard::{
    AthleteStanding, ChallengeSummary, Leaderboard, LeaderboardEntry, MemberBoard,
    MemberStanding, Metric, TeamStanding,
};
pub use ordered_map::OrderedMap;
pub use stats::{
    Aggregation, AthleteAggregate, DailyBucket, MemberSet, TeamAggregate, DAILY_CAP_METERS,
};
