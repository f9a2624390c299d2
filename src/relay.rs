//! Prompt relay
//!
//! Turns controller intents into single, self-contained generation calls and
//! tracks the one piece of cross-request state: the current mood.

mod error;
pub mod prompt;
mod session;

pub use error::RelayError;
pub use session::ConversationSession;

use crate::llm::{LlmRequest, LlmService};
use std::sync::Arc;

/// Mediator between callers and the generation capability
#[derive(Clone)]
pub struct PromptRelay {
    llm: Arc<dyn LlmService>,
    session: Arc<ConversationSession>,
}

impl PromptRelay {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmService>, session: Arc<ConversationSession>) -> Self {
        Self { llm, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<ConversationSession> {
        &self.session
    }

    /// Record a new mood and ask for a warm acknowledgment.
    ///
    /// The mood slot is overwritten before the provider is called, so it stays
    /// updated even when generation fails.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::GenerationFailure`] when the provider call fails.
    pub async fn declare_mood(&self, mood: &str) -> Result<String, RelayError> {
        self.session.set_mood(mood).await;
        tracing::info!(mood_chars = mood.chars().count(), "Mood declared");

        self.generate("declare_mood", prompt::mood_prompt(mood)).await
    }

    /// Answer a chat message in light of the stored mood.
    ///
    /// Works before any mood was declared; the prompt then carries
    /// [`prompt::UNKNOWN_MOOD`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::GenerationFailure`] when the provider call fails.
    pub async fn converse(&self, message: &str) -> Result<String, RelayError> {
        let mood = self.session.mood().await;
        tracing::debug!(
            mood_set = mood.is_some(),
            message_chars = message.chars().count(),
            "Chat message received"
        );

        self.generate("converse", prompt::chat_prompt(mood.as_deref(), message))
            .await
    }

    async fn generate(&self, operation: &str, prompt: String) -> Result<String, RelayError> {
        let request = LlmRequest::new(prompt);
        match self.llm.complete(&request).await {
            Ok(response) => Ok(response.text),
            Err(e) => {
                tracing::warn!(operation, error = %e, "Generation failed");
                Err(RelayError::GenerationFailure(e))
            }
        }
    }
}
