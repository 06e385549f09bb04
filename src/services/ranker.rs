// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ranking shared by every view and both metrics.

use crate::models::{AthleteAggregate, LeaderboardEntry, MemberStanding, Metric, TeamAggregate};

/// Anything that can be placed on a leaderboard.
pub trait Rankable {
    /// Value of `metric` for this entity, in meters.
    fn metric_value(&self, metric: Metric) -> f64;
}

impl<T: Rankable + ?Sized> Rankable for &T {
    fn metric_value(&self, metric: Metric) -> f64 {
        (**self).metric_value(metric)
    }
}

impl Rankable for AthleteAggregate {
    fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Capped => self.capped_distance_meters,
            Metric::Raw => self.total_distance_meters,
        }
    }
}

impl Rankable for TeamAggregate {
    fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Capped => self.capped_distance_meters,
            Metric::Raw => self.total_distance_meters,
        }
    }
}

impl Rankable for MemberStanding {
    fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Capped => self.capped_distance_meters,
            Metric::Raw => self.total_distance_meters,
        }
    }
}

/// Sort descending by `metric` and number positions 1..=N.
///
/// The sort is stable, so ties keep the order the items were supplied in
/// (aggregate creation order). Every rank is used exactly once.
pub fn rank<T, I>(items: I, metric: Metric) -> Vec<LeaderboardEntry<T>>
where
    T: Rankable,
    I: IntoIterator<Item = T>,
{
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by(|a, b| b.metric_value(metric).total_cmp(&a.metric_value(metric)));

    items
        .into_iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardEntry {
            rank: i as u32 + 1,
            entry,
        })
        .collect()
}
