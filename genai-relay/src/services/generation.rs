//! The single upstream round trip shared by every generation endpoint.

use crate::services::metrics;
use crate::services::providers::{PromptPart, ProviderError, TextProvider};
use std::time::Instant;

/// Send `parts` to the provider once and return the generated text.
///
/// No retries: the first upstream failure is returned as-is.
pub async fn generate(
    provider: &dyn TextProvider,
    endpoint: &str,
    parts: &[PromptPart],
) -> Result<String, ProviderError> {
    let start = Instant::now();
    let result = provider.generate(parts).await;
    metrics::record_provider_latency(
        provider.name(),
        provider.model(),
        start.elapsed().as_secs_f64(),
    );

    match result {
        Ok(response) => {
            metrics::record_genai_request(
                endpoint,
                provider.model(),
                response.finish_reason.as_str(),
            );
            metrics::record_tokens(
                provider.model(),
                response.input_tokens,
                response.output_tokens,
            );
            tracing::info!(
                endpoint,
                model = provider.model(),
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "Upstream generation succeeded"
            );
            Ok(response.text)
        }
        Err(e) => {
            metrics::record_provider_error(provider.name(), e.kind());
            tracing::error!(
                endpoint,
                provider = provider.name(),
                error = %e,
                "Upstream generation failed"
            );
            Err(e)
        }
    }
}
