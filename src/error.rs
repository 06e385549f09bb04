// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::feed::FeedError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Upstream feed error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream error detail for a 429 from the feed.
    pub const UPSTREAM_RATE_LIMIT: &'static str = "Upstream rate limit exceeded";

    /// Seconds a client should wait after an upstream 429.
    pub const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;

    /// Whether this error came from the upstream rate limiting us.
    pub fn is_upstream_rate_limit(&self) -> bool {
        matches!(self, AppError::Upstream(msg) if msg == Self::UPSTREAM_RATE_LIMIT)
    }

    /// Map a feed error for input the client posted: bad shape is a 400.
    pub fn from_posted(err: FeedError) -> Self {
        match err {
            FeedError::InvalidFormat(msg) => AppError::BadRequest(msg),
            other => AppError::from_upstream(other),
        }
    }

    /// Map a feed error from the upstream source: everything is a 502.
    pub fn from_upstream(err: FeedError) -> Self {
        match err {
            FeedError::RateLimited => AppError::Upstream(Self::UPSTREAM_RATE_LIMIT.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rate_limited = self.is_upstream_rate_limit();
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream feed error");
                (StatusCode::BAD_GATEWAY, "upstream_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if rate_limited {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(Self::RATE_LIMIT_RETRY_AFTER_SECS),
            );
        }
        response
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
