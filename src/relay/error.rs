//! Relay error types

use crate::llm::LlmError;
use thiserror::Error;

/// Errors surfaced by relay operations
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// The generation capability failed; no reply was fabricated
    #[error("generation failed: {0}")]
    GenerationFailure(#[from] LlmError),
    /// The relay could not be reached, or its answer could not be read
    #[error("transport error: {0}")]
    Transport(String),
    /// The relay answered with an error status
    #[error("relay rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}
