//! Generation capability abstraction
//!
//! The relay only ever needs "prompt in, reply text out". Providers implement
//! [`LlmService`]; everything above this module is provider-agnostic.

mod config;
mod error;
mod gemini;
mod types;

#[cfg(test)]
pub mod testing;

pub use config::LlmConfig;
pub use error::{LlmError, LlmErrorKind};
pub use gemini::{GeminiModel, GeminiService};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for text-generation providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Generate a reply for a single, self-contained prompt
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    #[must_use]
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = request.prompt.chars().count(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Build the configured provider, wrapped with logging.
///
/// Returns `None` when no API key and no gateway are configured.
#[must_use]
pub fn build_service(config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
    let api_key = match (&config.gemini_api_key, &config.gateway) {
        (Some(key), _) if !key.is_empty() => key.clone(),
        // The gateway handles authentication
        (_, Some(_)) => "implicit".to_string(),
        _ => return None,
    };

    let service = GeminiService::new(
        api_key,
        config.model.clone(),
        config.gateway.as_deref(),
        config.timeout,
    )
    .map_err(|e| tracing::error!(error = %e, "Failed to create Gemini client"))
    .ok()?;

    Some(Arc::new(LoggingService::new(Arc::new(service))))
}
