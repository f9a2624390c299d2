//! API request and response types
//!
//! The same types are used by the HTTP relay client, so both ends of the wire
//! agree on field names.

use serde::{Deserialize, Serialize};

/// Request to declare the user's current mood
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub mood: String,
}

/// Request to send a chat message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Reply text produced by the generation capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Current contents of the mood slot
#[derive(Debug, Serialize)]
pub struct CurrentMoodResponse {
    pub mood: Option<String>,
}

/// One entry of the mood catalog
#[derive(Debug, Serialize)]
pub struct MoodOptionInfo {
    pub label: &'static str,
    pub emoji: &'static str,
}

/// Response for mood catalog
#[derive(Debug, Serialize)]
pub struct MoodCatalogResponse {
    pub moods: Vec<MoodOptionInfo>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
