// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use challenge_leaderboard::config::Config;
use challenge_leaderboard::routes::create_router;
use challenge_leaderboard::services::FeedClient;
use challenge_leaderboard::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create a test app pointed at the given upstream URLs.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(
    activities_url: &str,
    roster_url: Option<&str>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        activities_url: activities_url.to_string(),
        roster_url: roster_url.map(str::to_string),
        ..Config::default()
    };

    let feed_client = FeedClient::new(
        config.activities_url.clone(),
        config.roster_url.clone(),
        config.upstream_timeout_secs,
        config.feed_cache_ttl_secs,
    )
    .expect("Failed to build feed client");

    let state = Arc::new(AppState {
        config,
        feed_client,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with no reachable upstream and no roster.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(&Config::default().activities_url, None)
}

/// One flat feed record.
#[allow(dead_code)]
pub fn record(first: &str, last: &str, team: Option<&str>, meters: f64, date: &str) -> Value {
    let mut athlete = json!({ "firstname": first, "lastname": last });
    if let Some(team) = team {
        athlete["team"] = json!(team);
    }
    json!({
        "athlete": athlete,
        "name": "Walk",
        "type": "Walk",
        "distance": meters,
        "date": date,
    })
}

/// Load a JSON fixture from `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let content = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&content).expect("Failed to parse fixture")
}
