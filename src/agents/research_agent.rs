//! Research Agent - derives the topic catalog and style rules from reference material.
//!
//! The agent reads either the built-in sample pack or a supplied document,
//! asks the LLM to list the math categories it covers, and returns
//! [`ResearchFindings`]. A failed LLM call degrades to a fixed fallback
//! catalog; an unreadable document or an unparseable reply is an error the
//! orchestrator handles.
//!
//! # Example
//!
//! ```ignore
//! use quant_forge::agents::research_agent::{ResearchAgent, ResearchConfig};
//! use quant_forge::document::ResearchSource;
//! use quant_forge::llm::LiteLlmClient;
//! use std::sync::Arc;
//!
//! let llm_client = Arc::new(LiteLlmClient::from_env()?);
//! let agent = ResearchAgent::with_defaults(llm_client);
//!
//! let findings = agent.conduct_research(&ResearchSource::Embedded).await?;
//! println!("Found {} categories", findings.topics.len());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::{DocumentReader, FileDocumentReader, ResearchSource};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::{build_research_prompt, RESEARCH_AGENT_SYSTEM, SAMPLE_QUESTION_PACK};
use crate::utils::json_extraction::{try_extract_json_object, JsonExtractionError};

use super::error::{AgentError, AgentResult};

/// Topics used when the research call itself fails.
pub const FALLBACK_RESEARCH_TOPICS: [&str; 3] =
    ["Time, Speed & Distance", "Work & Time", "Profit & Loss"];

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the Research Agent.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Model identifier; empty uses the client's default.
    pub model: String,
    /// Temperature for LLM generation.
    pub temperature: f64,
    /// Maximum tokens for LLM response.
    pub max_tokens: u32,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}

impl ResearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature (clamped to 0.0-2.0).
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

// ============================================================================
// Findings
// ============================================================================

/// Result of one research pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchFindings {
    /// Topic catalog, in the order the model listed it.
    #[serde(default, deserialize_with = "one_or_many")]
    pub topics: Vec<String>,
    /// Style rules for the generator.
    #[serde(default, deserialize_with = "one_or_many")]
    pub style_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_analysis: Option<String>,
    /// Set when these findings are a fallback for a failed research call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResearchFindings {
    /// Fallback findings recorded when the research call fails.
    pub fn fallback(error: impl Into<String>) -> Self {
        Self {
            topics: FALLBACK_RESEARCH_TOPICS.iter().map(|t| t.to_string()).collect(),
            style_rules: Vec::new(),
            difficulty_analysis: None,
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Accepts `"x"`, `["x", "y"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}

// ============================================================================
// Research Agent
// ============================================================================

/// Research Agent that turns reference material into a topic catalog.
pub struct ResearchAgent {
    llm_client: Arc<dyn LlmProvider>,
    reader: Arc<dyn DocumentReader>,
    config: ResearchConfig,
}

impl std::fmt::Debug for ResearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResearchAgent {
    /// Agent name constant for identification.
    pub const AGENT_NAME: &'static str = "research_agent";

    pub fn new(llm_client: Arc<dyn LlmProvider>, config: ResearchConfig) -> Self {
        Self {
            llm_client,
            reader: Arc::new(FileDocumentReader),
            config,
        }
    }

    pub fn with_defaults(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self::new(llm_client, ResearchConfig::default())
    }

    /// Replaces the document reader used for [`ResearchSource::Document`].
    pub fn with_reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Analyzes the reference material and returns the findings.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Document`] if a supplied document cannot be read
    /// - [`AgentError::ResponseParseError`] if the reply holds no usable JSON
    ///
    /// A failed LLM call is not an error: it yields [`ResearchFindings::fallback`].
    pub async fn conduct_research(&self, source: &ResearchSource) -> AgentResult<ResearchFindings> {
        let reference_text = match source {
            ResearchSource::Embedded => {
                tracing::info!("Using embedded reference material");
                SAMPLE_QUESTION_PACK.to_string()
            }
            ResearchSource::Document(path) => {
                let text = self.reader.extract_text(path)?;
                tracing::info!(path = %path.display(), chars = text.len(), "Read reference document");
                text
            }
        };

        let request = GenerationRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(RESEARCH_AGENT_SYSTEM),
                Message::user(build_research_prompt(&reference_text)),
            ],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_output();

        let content = match self.llm_client.complete(request).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Research call failed, using fallback topics");
                return Ok(ResearchFindings::fallback(e.to_string()));
            }
        };

        let findings = parse_findings(&content)?;
        tracing::info!(topics = findings.topics.len(), "Research complete");
        Ok(findings)
    }
}

/// Parses a research reply, tolerating fences and surrounding chatter.
pub fn parse_findings(content: &str) -> AgentResult<ResearchFindings> {
    let json_content = try_extract_json_object(content).map_err(|e| match e {
        JsonExtractionError::Truncated {
            partial_preview,
            unclosed_braces,
        } => AgentError::ResponseParseError(format!(
            "JSON appears truncated in research response: {} unclosed braces. Partial: {}...",
            unclosed_braces, partial_preview
        )),
        JsonExtractionError::NotFound { content_preview } => AgentError::ResponseParseError(
            format!(
                "Could not extract JSON from research response. Content starts with: '{}'",
                content_preview
            ),
        ),
    })?;

    serde_json::from_str(&json_content).map_err(|e| {
        AgentError::ResponseParseError(format!(
            "Failed to parse research response: {}. Content: {}",
            e,
            json_content.chars().take(500).collect::<String>()
        ))
    })
}
