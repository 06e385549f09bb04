// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge Leaderboard API Server
//!
//! Ranks athletes and teams in a walking challenge from an activity feed,
//! counting at most 10 km per athlete per calendar day.

use challenge_leaderboard::{config::Config, services::FeedClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Challenge Leaderboard API");

    let feed_client = FeedClient::new(
        config.activities_url.clone(),
        config.roster_url.clone(),
        config.upstream_timeout_secs,
        config.feed_cache_ttl_secs,
    )?;
    tracing::info!(
        activities_url = %config.activities_url,
        roster_enabled = feed_client.has_roster(),
        cache_ttl_secs = config.feed_cache_ttl_secs,
        "Feed client initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        feed_client,
    });

    // Build router
    let app = challenge_leaderboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("challenge_leaderboard=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
