// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Challenge-Leaderboard: rank walking-challenge athletes and teams
//!
//! This crate turns the raw activity feed of a distance challenge into
//! athlete and team leaderboards. Each athlete's distance counts toward the
//! official ranking only up to a daily cap; the uncapped total is reported
//! alongside it.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::FeedClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub feed_client: FeedClient,
}
