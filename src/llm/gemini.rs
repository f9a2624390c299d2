//! Google Gemini provider implementation

use super::types::{LlmRequest, LlmResponse, ThinkingMode, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DIRECT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini models
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    #[default]
    Gemini25Flash,
    Gemini25FlashLite,
    Gemini25Pro,
    /// Any other model name the provider accepts
    Other(String),
}

impl GeminiModel {
    #[must_use]
    pub fn api_name(&self) -> &str {
        match self {
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Other(name) => name,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "" | "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
            "gemini-2.5-flash-lite" => GeminiModel::Gemini25FlashLite,
            "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
            other => GeminiModel::Other(other.to_string()),
        }
    }

    /// Pro models cannot disable thinking entirely; the smallest budget is 128.
    fn minimal_thinking_budget(&self) -> i32 {
        match self {
            GeminiModel::Gemini25Pro => 128,
            _ => 0,
        }
    }
}

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    model: GeminiModel,
    url: String,
}

impl GeminiService {
    /// Client for `model`, routed through `gateway` when one is given.
    ///
    /// # Errors
    ///
    /// Returns a network [`LlmError`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        model: GeminiModel,
        gateway: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let url = match gateway {
            Some(gw) => format!(
                "{}/gemini/v1beta/models/{}:generateContent",
                gw.trim_end_matches('/'),
                model.api_name()
            ),
            None => format!(
                "{DIRECT_API_BASE}/v1beta/models/{}:generateContent",
                model.api_name()
            ),
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            url,
        })
    }

    fn translate_request(&self, request: &LlmRequest) -> GeminiRequest {
        let thinking_config = match request.thinking {
            ThinkingMode::Minimal => Some(GeminiThinkingConfig {
                thinking_budget: self.model.minimal_thinking_budget(),
            }),
            ThinkingMode::ProviderDefault => None,
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: thinking_config.map(|thinking_config| GeminiGenerationConfig {
                thinking_config: Some(thinking_config),
            }),
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<LlmResponse, LlmError> {
        let candidate = resp.candidates.into_iter().next().ok_or_else(|| {
            let reason = resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "none given".to_string());
            LlmError::malformed(format!("No candidates in response (block reason: {reason})"))
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::malformed(format!(
                "Candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u64::from(u.prompt_token_count),
                output_tokens: u64::from(u.candidates_token_count),
            })
            .unwrap_or_default();

        Ok(LlmResponse { text, usage })
    }
}

fn classify_status(status: u16, message: &str) -> LlmError {
    match status {
        400 => LlmError::invalid_request(format!("Invalid request: {message}")),
        401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
        408 => LlmError::network(format!("Request timeout: {message}")),
        429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
        500..=599 => LlmError::server_error(format!("Server error: {message}")),
        _ => LlmError::unknown(format!("HTTP {status}: {message}")),
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = self.translate_request(request);

        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&gemini_request);

        // Gateway mode authenticates on our behalf
        if self.api_key != "implicit" {
            builder = builder.header("x-goog-api-key", &self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                LlmError::network(format!("Connection failed: {e}"))
            } else {
                LlmError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |error_resp| error_resp.error.message);
            return Err(classify_status(status.as_u16(), &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        self.model.api_name()
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<GeminiThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiThinkingConfig {
    thinking_budget: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn service(gateway: Option<&str>, model: GeminiModel) -> GeminiService {
        GeminiService::new(
            "test-key".to_string(),
            model,
            gateway,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Serve a single canned response on an ephemeral port, returning the base URL
    async fn spawn_gateway(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/gemini/v1beta/models/:model",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_direct_url() {
        let svc = service(None, GeminiModel::Gemini25Flash);
        assert_eq!(
            svc.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_gateway_url_trims_trailing_slash() {
        let svc = service(Some("http://gw.local/llm/"), GeminiModel::Gemini25Flash);
        assert_eq!(
            svc.url,
            "http://gw.local/llm/gemini/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_disables_thinking() {
        let svc = service(None, GeminiModel::Gemini25Flash);
        let body = serde_json::to_value(svc.translate_request(&LlmRequest::new("hi"))).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }],
                "generationConfig": { "thinkingConfig": { "thinkingBudget": 0 } }
            })
        );
    }

    #[test]
    fn test_pro_model_uses_smallest_budget() {
        let svc = service(None, GeminiModel::Gemini25Pro);
        let body = serde_json::to_value(svc.translate_request(&LlmRequest::new("hi"))).unwrap();
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            json!(128)
        );
    }

    #[test]
    fn test_provider_default_thinking_omits_config() {
        let svc = service(None, GeminiModel::Gemini25Flash);
        let request = LlmRequest {
            prompt: "hi".to_string(),
            thinking: ThinkingMode::ProviderDefault,
        };
        let body = serde_json::to_value(svc.translate_request(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_model_names() {
        assert_eq!(GeminiModel::from_name(""), GeminiModel::Gemini25Flash);
        assert_eq!(
            GeminiModel::from_name("gemini-2.5-pro"),
            GeminiModel::Gemini25Pro
        );
        let other = GeminiModel::from_name("gemini-3-flash-preview");
        assert_eq!(other.api_name(), "gemini-3-flash-preview");
    }

    #[test]
    fn test_normalize_joins_text_parts() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hey, " }, { "text": "what happened?" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 40, "candidatesTokenCount": 6, "totalTokenCount": 46 }
        }))
        .unwrap();

        let out = GeminiService::normalize_response(resp).unwrap();
        assert_eq!(out.text, "Hey, what happened?");
        assert_eq!(out.usage.input_tokens, 40);
        assert_eq!(out.usage.output_tokens, 6);
    }

    #[test]
    fn test_normalize_blocked_prompt_is_malformed() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();

        let err = GeminiService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::MalformedResponse);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_normalize_empty_candidate_is_malformed() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();

        let err = GeminiService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::MalformedResponse);
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status(400, "x").kind, LlmErrorKind::InvalidRequest);
        assert_eq!(classify_status(403, "x").kind, LlmErrorKind::Auth);
        assert_eq!(classify_status(429, "x").kind, LlmErrorKind::RateLimit);
        assert_eq!(classify_status(503, "x").kind, LlmErrorKind::ServerError);
        assert_eq!(classify_status(418, "x").kind, LlmErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_complete_against_gateway() {
        let base = spawn_gateway(
            StatusCode::OK,
            json!({
                "candidates": [{ "content": { "parts": [{ "text": "I'm here for you." }] } }]
            }),
        )
        .await;

        let svc = service(Some(base.as_str()), GeminiModel::Gemini25Flash);
        let out = svc.complete(&LlmRequest::new("hello")).await.unwrap();
        assert_eq!(out.text, "I'm here for you.");
    }

    #[tokio::test]
    async fn test_complete_surfaces_provider_error() {
        let base = spawn_gateway(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED" } }),
        )
        .await;

        let svc = service(Some(base.as_str()), GeminiModel::Gemini25Flash);
        let err = svc.complete(&LlmRequest::new("hello")).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::RateLimit);
        assert!(err.message.contains("quota"));
    }
}
