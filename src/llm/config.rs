//! Provider configuration

use super::GeminiModel;
use std::time::Duration;

/// Default upper bound on a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the generation provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    /// Gateway base URL; when set, the gateway handles authentication
    pub gateway: Option<String>,
    pub model: GeminiModel,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gateway: None,
            model: GeminiModel::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout = lookup("LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self {
            gemini_api_key: lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")),
            gateway: lookup("LLM_GATEWAY").filter(|s| !s.is_empty()),
            model: lookup("GEMINI_MODEL")
                .map(|name| GeminiModel::from_name(&name))
                .unwrap_or_default(),
            timeout,
        }
    }
}
