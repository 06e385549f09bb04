// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream activity feed: fetching and shape validation.
//!
//! Handles:
//! - Fetching the activity feed (optionally for a challenge period)
//! - Fetching the member roster
//! - Short-lived in-memory caching of fetched JSON
//! - Flattening grouped `{athlete_name, team, activities}` entries

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::models::activity::AthleteGroupHeader;
use crate::models::{ActivityRecord, AthleteRef, RosterMember};

/// Feed retrieval or shape errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Invalid feed format: {0}")]
    InvalidFormat(String),

    #[error("Upstream request failed: {0}")]
    Http(String),

    #[error("Upstream rate limit exceeded")]
    RateLimited,

    #[error("Cache TTL of {0} seconds is out of range")]
    InvalidCacheTtl(u64),
}

/// Convert a configured TTL in seconds, rejecting values chrono cannot hold.
pub fn cache_ttl_from_secs(secs: u64) -> Option<TimeDelta> {
    i64::try_from(secs).ok().and_then(TimeDelta::try_seconds)
}

/// Validate and flatten an activity feed.
///
/// The whole feed is rejected, before any record is used, if the top-level
/// value is not an array or any element is not an object.
pub fn parse_activity_feed(feed: &Value) -> Result<Vec<ActivityRecord>, FeedError> {
    let elements = expect_array(feed, "activity feed")?;
    let mut records = Vec::with_capacity(elements.len());

    for (i, element) in elements.iter().enumerate() {
        let object = element.as_object().ok_or_else(|| {
            FeedError::InvalidFormat(format!(
                "activity feed element {} is {}, expected an object",
                i,
                json_kind(element)
            ))
        })?;

        match object.get("activities") {
            Some(Value::Array(nested)) => {
                let header = AthleteGroupHeader::deserialize(element)
                    .map_err(|e| FeedError::InvalidFormat(format!("element {}: {}", i, e)))?;
                for (j, activity) in nested.iter().enumerate() {
                    if !activity.is_object() {
                        return Err(FeedError::InvalidFormat(format!(
                            "activity {} of element {} is {}, expected an object",
                            j,
                            i,
                            json_kind(activity)
                        )));
                    }
                    let mut record = parse_record(activity, i)?;
                    record.athlete = Some(AthleteRef {
                        athlete_name: header.athlete_name.clone(),
                        team: header.team.clone(),
                        ..Default::default()
                    });
                    records.push(record);
                }
            }
            _ => records.push(parse_record(element, i)?),
        }
    }

    Ok(records)
}

/// Validate a member roster.
pub fn parse_roster(roster: &Value) -> Result<Vec<RosterMember>, FeedError> {
    expect_array(roster, "roster")?
        .iter()
        .enumerate()
        .map(|(i, element)| {
            if !element.is_object() {
                return Err(FeedError::InvalidFormat(format!(
                    "roster element {} is {}, expected an object",
                    i,
                    json_kind(element)
                )));
            }
            RosterMember::deserialize(element)
                .map_err(|e| FeedError::InvalidFormat(format!("roster element {}: {}", i, e)))
        })
        .collect()
}

fn parse_record(value: &Value, index: usize) -> Result<ActivityRecord, FeedError> {
    ActivityRecord::deserialize(value)
        .map_err(|e| FeedError::InvalidFormat(format!("element {}: {}", index, e)))
}

fn expect_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, FeedError> {
    value.as_array().ok_or_else(|| {
        FeedError::InvalidFormat(format!("{} is {}, expected an array", what, json_kind(value)))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FeedClient - upstream HTTP access with a short-lived cache
// ─────────────────────────────────────────────────────────────────────────────

/// Cached upstream response body.
#[derive(Clone)]
pub struct CachedFeed {
    body: Value,
    fetched_at: DateTime<Utc>,
}

impl CachedFeed {
    /// A TTL that overflows the calendar never expires.
    fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.fetched_at
            .checked_add_signed(ttl)
            .map_or(true, |expires| now < expires)
    }
}

/// Shared feed cache type, keyed by full request URL.
pub type FeedCache = Arc<DashMap<String, CachedFeed>>;

/// Client for the upstream activity and roster endpoints.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    activities_url: String,
    roster_url: Option<String>,
    cache: FeedCache,
    cache_ttl: TimeDelta,
}

impl FeedClient {
    /// Create a client. A zero `cache_ttl_secs` disables caching.
    pub fn new(
        activities_url: String,
        roster_url: Option<String>,
        timeout_secs: u64,
        cache_ttl_secs: u64,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let cache_ttl =
            cache_ttl_from_secs(cache_ttl_secs).ok_or(FeedError::InvalidCacheTtl(cache_ttl_secs))?;

        Ok(Self {
            http,
            activities_url,
            roster_url,
            cache: Arc::new(DashMap::new()),
            cache_ttl,
        })
    }

    /// Number of upstream responses currently held in the cache.
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    pub fn has_roster(&self) -> bool {
        self.roster_url.is_some()
    }

    /// Fetch the raw activity feed, optionally for one challenge period.
    pub async fn fetch_activities(&self, period: Option<&str>) -> Result<Value, FeedError> {
        let mut url = reqwest::Url::parse(&self.activities_url)
            .map_err(|e| FeedError::Http(format!("Invalid activities URL: {}", e)))?;
        if let Some(period) = period {
            url.query_pairs_mut().append_pair("period", period);
        }
        self.get_json(url).await
    }

    /// Fetch the raw member roster. `Ok(None)` when no roster is configured.
    pub async fn fetch_roster(&self) -> Result<Option<Value>, FeedError> {
        let Some(roster_url) = &self.roster_url else {
            return Ok(None);
        };
        let url = reqwest::Url::parse(roster_url)
            .map_err(|e| FeedError::Http(format!("Invalid roster URL: {}", e)))?;
        self.get_json(url).await.map(Some)
    }

    fn caching(&self) -> bool {
        self.cache_ttl > TimeDelta::zero()
    }

    async fn get_json(&self, url: reqwest::Url) -> Result<Value, FeedError> {
        let key = url.to_string();
        let now = Utc::now();

        if self.caching() {
            let hit = self
                .cache
                .get(&key)
                .filter(|cached| cached.is_fresh(now, self.cache_ttl))
                .map(|cached| cached.body.clone());
            if let Some(body) = hit {
                tracing::debug!(url = %key, "Feed cache hit");
                return Ok(body);
            }
        }

        tracing::info!(url = %key, "Fetching upstream feed");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Upstream rate limit hit (429)");
                return Err(FeedError::RateLimited);
            }

            return Err(FeedError::Http(format!("HTTP {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FeedError::InvalidFormat(format!("JSON parse error: {}", e)))?;

        if self.caching() {
            // Drop every expired response so distinct URLs do not pile up.
            let ttl = self.cache_ttl;
            self.cache.retain(|_, cached| cached.is_fresh(now, ttl));
            self.cache.insert(
                key,
                CachedFeed {
                    body: body.clone(),
                    fetched_at: now,
                },
            );
        }

        Ok(body)
    }
}
