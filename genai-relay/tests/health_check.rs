//! Integration tests for the operational endpoints.

mod common;

use common::spawn_app;
use genai_relay::services::init_metrics;
use genai_relay::services::providers::mock::MockTextProvider;
use reqwest::StatusCode;
use std::time::Duration;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = spawn_app(MockTextProvider::replying("unused")).await;

    let response = app
        .client
        .get(app.url("/health"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "genai-relay");
}

#[tokio::test]
async fn readiness_check_returns_ok_when_upstream_healthy() {
    let app = spawn_app(MockTextProvider::replying("unused")).await;

    let response = app
        .client
        .get(app.url("/ready"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_check_fails_when_upstream_unhealthy() {
    let app = spawn_app(MockTextProvider::failing("bad key")).await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_endpoint_reports_requests() {
    init_metrics();
    let app = spawn_app(MockTextProvider::replying("unused")).await;

    app.client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    let response = app
        .client
        .get(app.url("/metrics"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("path=\"/health\""));
}
