//! HTTP API for the prompt relay

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::relay::PromptRelay;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: PromptRelay,
}

impl AppState {
    #[must_use]
    pub fn new(relay: PromptRelay) -> Self {
        Self { relay }
    }
}
