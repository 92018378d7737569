//! LLM integration for quant-forge.
//!
//! Every generative collaborator (question generator, solver strategies,
//! quality reviewer, researcher) talks to a model through [`LlmProvider`].
//!
//! ```ignore
//! use quant_forge::llm::{GenerationRequest, LiteLlmClient, LlmProvider, Message};
//!
//! let client = LiteLlmClient::from_env()?;
//! let request = GenerationRequest::new("", vec![Message::user("Solve: 2 + 2")]);
//! let text = client.complete(request).await?;
//! ```

pub mod litellm;

pub use litellm::{
    Choice, GenerationRequest, GenerationResponse, LiteLlmClient, LlmProvider, Message,
    ResponseFormat, Usage, DEFAULT_MODEL, OPENROUTER_API_BASE,
};
