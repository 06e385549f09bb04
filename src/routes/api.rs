// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard API routes.

use crate::error::{AppError, Result};
use crate::models::{Leaderboard, MemberBoard, Metric};
use crate::services::leaderboard::{leaderboard_from_feed, member_board_from_feed};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_PERIOD_LEN: usize = 32;

/// Leaderboard routes (public, read-only).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/leaderboard",
            get(get_leaderboard).post(post_leaderboard),
        )
        .route("/api/members", get(get_members).post(post_members))
}

#[derive(Deserialize)]
struct BoardQuery {
    /// Challenge period forwarded to the upstream feed (e.g. "secondWeek")
    period: Option<String>,
    /// "capped" (default) or "raw"
    metric: Option<String>,
}

impl BoardQuery {
    fn metric(&self) -> Result<Metric> {
        parse_metric(self.metric.as_deref())
    }

    fn period(&self) -> Result<Option<&str>> {
        validate_period(self.period.as_deref())
    }
}

fn parse_metric(raw: Option<&str>) -> Result<Metric> {
    match raw {
        None | Some("") => Ok(Metric::default()),
        Some("capped") => Ok(Metric::Capped),
        Some("raw") => Ok(Metric::Raw),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid 'metric' parameter {:?}: must be 'capped' or 'raw'",
            other
        ))),
    }
}

fn validate_period(raw: Option<&str>) -> Result<Option<&str>> {
    match raw {
        None => Ok(None),
        Some(p)
            if !p.is_empty()
                && p.len() <= MAX_PERIOD_LEN
                && p.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            Ok(Some(p))
        }
        Some(_) => Err(AppError::BadRequest(format!(
            "Invalid 'period' parameter: must be 1-{} alphanumeric characters",
            MAX_PERIOD_LEN
        ))),
    }
}

/// Run the pure leaderboard computation off the async worker threads.
async fn compute<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Leaderboard task failed: {}", e)))?
}

// ─── Leaderboard ─────────────────────────────────────────────

/// Athlete and team leaderboards.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub generated_at: String,
    #[serde(flatten)]
    pub leaderboard: Leaderboard,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(leaderboard: Leaderboard) -> Self {
        Self {
            generated_at: format_utc_rfc3339(chrono::Utc::now()),
            leaderboard,
        }
    }
}

/// Fetch the upstream feed and rank it.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let metric = params.metric()?;
    let period = params.period()?;
    tracing::debug!(period = ?period, metric = ?metric, "Building leaderboard");

    let feed = state
        .feed_client
        .fetch_activities(period)
        .await
        .map_err(AppError::from_upstream)?;

    let leaderboard = compute(move || {
        leaderboard_from_feed(&feed, metric).map_err(AppError::from_upstream)
    })
    .await?;

    tracing::info!(
        athletes = leaderboard.athletes.len(),
        teams = leaderboard.teams.len(),
        activities = leaderboard.summary.total_activities,
        "Leaderboard built"
    );

    Ok(Json(leaderboard.into()))
}

/// Rank a feed supplied in the request body.
async fn post_leaderboard(
    Query(params): Query<BoardQuery>,
    Json(feed): Json<Value>,
) -> Result<Json<LeaderboardResponse>> {
    let metric = params.metric()?;

    let leaderboard = compute(move || {
        leaderboard_from_feed(&feed, metric).map_err(AppError::from_posted)
    })
    .await?;

    Ok(Json(leaderboard.into()))
}

// ─── Roster View ─────────────────────────────────────────────

/// Roster-driven leaderboard.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberBoardResponse {
    pub generated_at: String,
    #[serde(flatten)]
    pub board: MemberBoard,
}

impl From<MemberBoard> for MemberBoardResponse {
    fn from(board: MemberBoard) -> Self {
        Self {
            generated_at: format_utc_rfc3339(chrono::Utc::now()),
            board,
        }
    }
}

#[derive(Deserialize)]
struct MemberBoardRequest {
    #[serde(default)]
    roster: Value,
    #[serde(default)]
    activities: Value,
}

/// Fetch roster and feed from upstream and reconcile them.
async fn get_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoardQuery>,
) -> Result<Json<MemberBoardResponse>> {
    let metric = params.metric()?;
    let period = params.period()?;

    if !state.feed_client.has_roster() {
        return Err(AppError::NotFound(
            "Roster source is not configured".to_string(),
        ));
    }

    let (roster, feed) = tokio::try_join!(
        state.feed_client.fetch_roster(),
        state.feed_client.fetch_activities(period),
    )
    .map_err(AppError::from_upstream)?;
    let roster = roster.ok_or_else(|| {
        AppError::NotFound("Roster source is not configured".to_string())
    })?;

    let board = compute(move || {
        member_board_from_feed(&roster, &feed, metric).map_err(AppError::from_upstream)
    })
    .await?;

    tracing::info!(
        members = board.members.len(),
        unmatched = board.unmatched_athletes.len(),
        "Member board built"
    );

    Ok(Json(board.into()))
}

/// Reconcile a posted roster and feed.
async fn post_members(
    Query(params): Query<BoardQuery>,
    Json(request): Json<MemberBoardRequest>,
) -> Result<Json<MemberBoardResponse>> {
    let metric = params.metric()?;

    let board = compute(move || {
        member_board_from_feed(&request.roster, &request.activities, metric)
            .map_err(AppError::from_posted)
    })
    .await?;

    Ok(Json(board.into()))
}
