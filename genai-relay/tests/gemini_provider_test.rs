//! Gemini HTTP contract, exercised against a local mock server.

use genai_relay::config::RelayConfig;
use genai_relay::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use genai_relay::services::providers::{PromptPart, ProviderError, TextProvider};
use genai_relay::startup::Application;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const API_KEY: &str = "test-api-key";

fn provider_for(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: API_KEY.to_string(),
        model: MODEL.to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .expect("provider")
}

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 1 }
    })
}

#[tokio::test]
async fn generate_posts_parts_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .generate(&[
            PromptPart::text("describe"),
            PromptPart::inline_bytes("image/jpeg", b"jpg"),
        ])
        .await
        .expect("generation succeeds");

    assert_eq!(response.text, "hi");
    assert_eq!(response.input_tokens, 4);

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": "describe" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "anBn" } }
                ]
            }]
        })
    );
}

#[tokio::test]
async fn generate_surfaces_error_envelope_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate(&[PromptPart::text("hello")])
        .await
        .unwrap_err();

    match &err {
        ProviderError::Api { status, .. } => assert_eq!(*status, 400),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn generate_surfaces_raw_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate(&[PromptPart::text("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "upstream overloaded");
}

#[tokio::test]
async fn generate_rejects_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate(&[PromptPart::text("hello")])
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn health_check_queries_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/gemini-test"))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-test" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .health_check()
        .await
        .expect("healthy");
}

#[tokio::test]
async fn relay_forwards_text_prompt_to_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = RelayConfig::with_api_key(API_KEY);
    config.google.api_base_url = server.uri();
    config.models.text_model = MODEL.to_string();

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/generate-text", port))
        .json(&json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "result": "hi" }));
}
