//! quant-forge: multiple-choice quant question generation with multi-agent
//! consensus validation.
//!
//! Each attempt generates one word problem, has three independently prompted
//! solvers answer it, and accepts the question only when the claimed answer
//! and all three solvers agree. Accepted questions are deployed to a form
//! endpoint.

pub mod agents;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod diversity;
pub mod document;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod prompts;
pub mod utils;
pub mod validation;

pub use error::{DeployError, DocumentError, LlmError};
