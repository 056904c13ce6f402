//! Shared helpers for genai-relay integration tests.

#![allow(dead_code)]

use genai_relay::config::RelayConfig;
use genai_relay::services::providers::mock::MockTextProvider;
use genai_relay::startup::Application;
use reqwest::multipart;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockTextProvider>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_multipart(&self, path: &str, form: multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Spawn the application on a random port in front of `provider`.
pub async fn spawn_app(provider: MockTextProvider) -> TestApp {
    spawn_app_with_config(RelayConfig::with_api_key("test-api-key"), provider).await
}

pub async fn spawn_app_with_config(config: RelayConfig, provider: MockTextProvider) -> TestApp {
    let provider = Arc::new(provider);
    let app = Application::build_with_provider(config, provider.clone())
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        provider,
        client: reqwest::Client::new(),
    }
}

pub fn file_part(bytes: &[u8], file_name: &str, mime: &str) -> multipart::Part {
    multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("valid mime type")
}
