// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

use crate::services::feed::cache_ttl_from_secs;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream activity feed URL
    pub activities_url: String,
    /// Upstream member roster URL (roster view disabled when unset)
    pub roster_url: Option<String>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// How long fetched upstream JSON is reused (0 disables caching)
    pub feed_cache_ttl_secs: u64,
    /// Upstream request timeout
    pub upstream_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            activities_url: "http://127.0.0.1:9/activities".to_string(),
            roster_url: None,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            feed_cache_ttl_secs: 0,
            upstream_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            activities_url: env::var("ACTIVITIES_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ACTIVITIES_URL"))?,
            roster_url: env::var("ROSTER_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_or("PORT", 8080)?,
            feed_cache_ttl_secs: parse_cache_ttl()?,
            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", 10)?,
        })
    }
}

/// Parse an optional numeric variable, rejecting malformed values.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// The cache TTL must also fit a chrono duration.
fn parse_cache_ttl() -> Result<u64, ConfigError> {
    let secs = parse_or("FEED_CACHE_TTL_SECS", 60)?;
    match cache_ttl_from_secs(secs) {
        Some(_) => Ok(secs),
        None => Err(ConfigError::Invalid("FEED_CACHE_TTL_SECS", secs.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid cross-test races.
        env::set_var("ACTIVITIES_URL", " https://feed.example.com/activities ");
        env::set_var("ROSTER_URL", "");
        env::set_var("FEED_CACHE_TTL_SECS", "15");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.activities_url, "https://feed.example.com/activities");
        assert!(config.roster_url.is_none());
        assert_eq!(config.feed_cache_ttl_secs, 15);
        assert_eq!(config.port, 8080);

        env::set_var("PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT", _)));
        env::remove_var("PORT");

        env::set_var("FEED_CACHE_TTL_SECS", "10000000000000000");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("FEED_CACHE_TTL_SECS", _)));
        env::set_var("FEED_CACHE_TTL_SECS", "18446744073709551615");
        assert!(Config::from_env().is_err());
        env::remove_var("FEED_CACHE_TTL_SECS");
    }
}
