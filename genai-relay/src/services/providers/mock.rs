//! Mock provider implementation for testing.

use super::{FinishReason, PromptPart, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail(String),
}

/// Mock text provider that returns a canned outcome and records every call.
pub struct MockTextProvider {
    outcome: Outcome,
    calls: Mutex<Vec<Vec<PromptPart>>>,
}

impl MockTextProvider {
    /// Succeed with `text` on every call.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reply(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail with an upstream API error carrying `message` on every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Parts received by each call, in call order.
    pub fn calls(&self) -> Vec<Vec<PromptPart>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, parts: &[PromptPart]) -> Result<ProviderResponse, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(parts.to_vec());

        match &self.outcome {
            Outcome::Reply(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: parts.len() as i32,
                output_tokens: 1,
                finish_reason: FinishReason::Complete,
            }),
            Outcome::Fail(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.outcome {
            Outcome::Reply(_) => Ok(()),
            Outcome::Fail(message) => Err(ProviderError::NotConfigured(message.clone())),
        }
    }
}
