//! Error types for quant-forge collaborator boundaries.
//!
//! Each external collaborator gets its own error enum:
//! - LLM API interactions (generation, solving, review, research)
//! - Reference document text extraction
//! - Question deployment to the remote form

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: LITELLM_API_KEY or OPENROUTER_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Missing API base URL: LITELLM_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while extracting text from a supplied document.
///
/// These are distinct from the case where no document was supplied at all,
/// which is not an error and selects the embedded reference material.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document '{path}' not found")]
    NotFound { path: String },

    #[error("Unsupported document type '{extension}' for '{path}'")]
    UnsupportedType { path: String, extension: String },

    #[error("Document '{path}' contains no extractable text")]
    Empty { path: String },

    #[error("Failed to parse document '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Failed to read document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while deploying an accepted question.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Form endpoint request failed: {0}")]
    RequestFailed(String),

    #[error("Form endpoint rejected the record ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Record is incomplete: {0}")]
    IncompleteRecord(String),
}
