//! Error types for the question generation agents.
//!
//! Defines the error type shared by the generator, the solver panel,
//! the quality reviewer and the research agent.

use thiserror::Error;

/// Errors that can occur during agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Error from the LLM provider.
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Error parsing an LLM response into the expected shape.
    #[error("Failed to parse LLM response: {0}")]
    ResponseParseError(String),

    /// A generated candidate is structurally invalid.
    #[error("Invalid candidate question: {0}")]
    InvalidCandidate(String),

    /// Reference document could not be read.
    #[error("Document error: {0}")]
    Document(#[from] crate::error::DocumentError),
}

impl From<crate::error::LlmError> for AgentError {
    fn from(err: crate::error::LlmError) -> Self {
        AgentError::LlmError(err.to_string())
    }
}

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
