//! Relay access for the controller
//!
//! The controller only needs the two relay operations. They can be served
//! over HTTP or, for tests and embedding, by an in-process [`PromptRelay`].

use crate::api::{ChatRequest, ErrorResponse, MoodRequest, ReplyResponse};
use crate::relay::{PromptRelay, RelayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// The two relay operations as seen from the controller
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn declare_mood(&self, mood: &str) -> Result<String, RelayError>;

    async fn converse(&self, message: &str) -> Result<String, RelayError>;
}

#[async_trait]
impl RelayClient for PromptRelay {
    async fn declare_mood(&self, mood: &str) -> Result<String, RelayError> {
        PromptRelay::declare_mood(self, mood).await
    }

    async fn converse(&self, message: &str) -> Result<String, RelayError> {
        PromptRelay::converse(self, message).await
    }
}

/// Relay reached over its HTTP interface
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

impl HttpRelayClient {
    /// # Errors
    ///
    /// Returns [`RelayError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<String, RelayError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes).map_or_else(
                |_| String::from_utf8_lossy(&bytes).into_owned(),
                |e| e.error,
            );
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<ReplyResponse>(&bytes)
            .map(|r| r.reply)
            .map_err(|e| RelayError::Transport(format!("Malformed relay response: {e}")))
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn declare_mood(&self, mood: &str) -> Result<String, RelayError> {
        self.post(
            "/api/mood",
            &MoodRequest {
                mood: mood.to_string(),
            },
        )
        .await
    }

    async fn converse(&self, message: &str) -> Result<String, RelayError> {
        self.post(
            "/api/chat",
            &ChatRequest {
                message: message.to_string(),
            },
        )
        .await
    }
}
