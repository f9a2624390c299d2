//! Per-conversation relay state

use tokio::sync::RwLock;

/// One active conversation as seen by the relay.
///
/// The only state carried between requests is the most recently declared
/// mood. A write is visible to every read that starts after it completes.
#[derive(Debug, Default)]
pub struct ConversationSession {
    mood: RwLock<Option<String>>,
}

impl ConversationSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mood slot, discarding any previous value
    pub async fn set_mood(&self, mood: impl Into<String>) {
        *self.mood.write().await = Some(mood.into());
    }

    pub async fn mood(&self) -> Option<String> {
        self.mood.read().await.clone()
    }
}
