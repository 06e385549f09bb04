// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream feed client tests against a mock HTTP server.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use challenge_leaderboard::services::{FeedClient, FeedError};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::record;

fn feed() -> Value {
    json!([
        record("Ana", "Lee", Some("Ducks"), 12000.0, "2025-09-08"),
        record("Bo", "Kim", Some("Geese"), 8000.0, "2025-09-08"),
    ])
}

fn client(server: &MockServer, cache_ttl_secs: u64) -> FeedClient {
    FeedClient::new(
        format!("{}/activities", server.uri()),
        Some(format!("{}/members", server.uri())),
        5,
        cache_ttl_secs,
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_forwards_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(query_param("period", "secondWeek"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server, 0)
        .fetch_activities(Some("secondWeek"))
        .await
        .unwrap();

    assert_eq!(body, feed());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server, 0).fetch_activities(None).await.unwrap_err();
    assert!(matches!(err, FeedError::RateLimited));
}

#[tokio::test]
async fn test_http_error_includes_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server, 0).fetch_activities(None).await.unwrap_err();
    match err {
        FeedError::Http(msg) => {
            assert!(msg.contains("503"));
            assert!(msg.contains("maintenance"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, 0).fetch_activities(None).await.unwrap_err();
    assert!(matches!(err, FeedError::InvalidFormat(_)));
}

#[tokio::test]
async fn test_cache_reuses_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 60);
    let first = client.fetch_activities(None).await.unwrap();
    let second = client.fetch_activities(None).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_stale_cache_entry_is_replaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(query_param("period", "week1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(query_param("period", "week2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 1);
    client.fetch_activities(Some("week1")).await.unwrap();
    assert_eq!(client.cached_responses(), 1);

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    // A different period evicts the expired entry.
    client.fetch_activities(Some("week2")).await.unwrap();
    assert_eq!(client.cached_responses(), 1);

    // The expired period is fetched again, not served stale.
    let body = client.fetch_activities(Some("week1")).await.unwrap();
    assert_eq!(body, feed());
    assert_eq!(client.cached_responses(), 2);
}

#[tokio::test]
async fn test_cache_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, 0);
    client.fetch_activities(None).await.unwrap();
    client.fetch_activities(None).await.unwrap();
    assert_eq!(client.cached_responses(), 0);
}

#[tokio::test]
async fn test_get_leaderboard_from_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(query_param("period", "week2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app_with(&format!("{}/activities", server.uri()), None);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leaderboard?period=week2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["athletes"][0]["name"], "Ana Lee");
    assert_eq!(body["athletes"][0]["capped_distance_meters"], 10000.0);
    assert_eq!(body["athletes"][1]["name"], "Bo Kim");
}

#[tokio::test]
async fn test_get_leaderboard_upstream_bad_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app_with(&format!("{}/activities", server.uri()), None);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leaderboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_get_members_from_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "firstname": "Bo", "lastname": "Kim", "team": "Geese" },
            { "firstname": "Ana", "lastname": "Lee", "team": "Ducks" },
            { "firstname": "Eve", "lastname": "Ng", "team": "Ducks" }
        ])))
        .mount(&server)
        .await;

    let (app, state) = common::create_test_app_with(
        &format!("{}/activities", server.uri()),
        Some(&format!("{}/members", server.uri())),
    );
    assert!(state.feed_client.has_roster());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/members?metric=raw")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let names: Vec<&str> = body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana Lee", "Bo Kim", "Eve Ng"]);
    assert_eq!(body["members"][2]["rank"], 3);
    assert_eq!(body["unmatched_athletes"], json!([]));
}
