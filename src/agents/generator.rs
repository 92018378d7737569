//! Question Generator Agent.
//!
//! Produces one structured [`CandidateQuestion`] per call for a requested
//! topic. The system prompt is rebuilt from the research findings every
//! time research runs, so the generator always sees the current catalog.

use std::sync::Arc;

use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::{build_generator_system_prompt, build_topic_prompt};
use crate::utils::json_extraction::{try_extract_json_object, JsonExtractionError};

use super::error::{AgentError, AgentResult};
use super::research_agent::ResearchFindings;
use super::types::CandidateQuestion;

/// Configuration for the Question Generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier; empty uses the client's default.
    pub model: String,
    /// Sampling temperature. Kept high for story variety.
    pub temperature: f64,
    /// Maximum tokens for the generated question.
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.9,
            max_tokens: 1500,
        }
    }
}

impl GeneratorConfig {
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

/// Question Generator that turns a topic into a candidate question.
pub struct QuestionGenerator {
    llm_client: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
    system_prompt: String,
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QuestionGenerator {
    /// Agent name constant for identification.
    pub const AGENT_NAME: &'static str = "question_generator";

    /// Creates a generator with an empty catalog; call [`configure`](Self::configure)
    /// once research findings exist.
    pub fn new(llm_client: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self {
            llm_client,
            config,
            system_prompt: build_generator_system_prompt(&[], &[]),
        }
    }

    pub fn with_defaults(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self::new(llm_client, GeneratorConfig::default())
    }

    /// Rebuilds the system prompt from research findings.
    pub fn configure(&mut self, findings: &ResearchFindings) {
        self.system_prompt = build_generator_system_prompt(&findings.topics, &findings.style_rules);
        tracing::debug!(topics = findings.topics.len(), "Generator prompt rebuilt");
    }

    /// Current system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Generates one candidate question about `topic`.
    ///
    /// The returned candidate's category is always `topic`, whatever the
    /// model wrote.
    ///
    /// # Errors
    ///
    /// - [`AgentError::LlmError`] if the service call fails
    /// - [`AgentError::ResponseParseError`] if the reply holds no JSON object
    /// - [`AgentError::InvalidCandidate`] if the object has the wrong shape
    pub async fn generate(&self, topic: &str) -> AgentResult<CandidateQuestion> {
        let request = GenerationRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(self.system_prompt.clone()),
                Message::user(build_topic_prompt(topic)),
            ],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_output();

        let content = self.llm_client.complete(request).await?;

        let json_content = try_extract_json_object(&content).map_err(|e| match e {
            JsonExtractionError::Truncated {
                partial_preview,
                unclosed_braces,
            } => AgentError::ResponseParseError(format!(
                "JSON appears truncated in generated question: {} unclosed braces. Partial: {}...",
                unclosed_braces, partial_preview
            )),
            JsonExtractionError::NotFound { content_preview } => AgentError::ResponseParseError(
                format!("Invalid JSON: reply starts with '{}'", content_preview),
            ),
        })?;

        let mut candidate = CandidateQuestion::from_json(&json_content)?;
        candidate.category = topic.to_string();

        tracing::debug!(
            topic,
            claimed = %candidate.correct_answer_numeric,
            "Candidate question generated"
        );
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::GenerationResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockLlmProvider {
        response: Result<String, String>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockLlmProvider {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: Ok(response.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            self.requests.lock().expect("lock not poisoned").push(request);
            match &self.response {
                Ok(content) => Ok(GenerationResponse::from_text("mock-model", content.clone())),
                Err(message) => Err(LlmError::RequestFailed(message.clone())),
            }
        }
    }

    fn mock_question() -> String {
        r#"```json
        {
            "category": "Trains",
            "story": "A boat travels 12 km downstream in 1 hour and the same distance upstream in 2 hours. What is its speed in still water?",
            "options": ["9 km/h", "10 km/h", "11 km/h", "12 km/h"],
            "correct_answer_numeric": "9",
            "correct_option": "9 km/h",
            "difficulty": "Medium"
        }
        ```"#
            .to_string()
    }

    #[tokio::test]
    async fn test_generate_overwrites_category() {
        let mock_llm = Arc::new(MockLlmProvider::new(mock_question()));
        let generator = QuestionGenerator::with_defaults(mock_llm.clone());

        let candidate = generator
            .generate("Boats & Streams")
            .await
            .expect("should parse question");

        assert_eq!(candidate.category, "Boats & Streams");
        assert_eq!(candidate.correct_option, "9 km/h");

        let requests = mock_llm.requests.lock().expect("lock not poisoned");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].response_format,
            Some(crate::llm::ResponseFormat::JsonObject)
        );
        assert!(requests[0].messages[1].content.ends_with("Boats & Streams"));
    }

    #[tokio::test]
    async fn test_configure_updates_prompt() {
        let mock_llm = Arc::new(MockLlmProvider::new(mock_question()));
        let mut generator = QuestionGenerator::with_defaults(mock_llm.clone());

        let findings = ResearchFindings {
            topics: vec!["Age Problems".to_string(), "Work & Time".to_string()],
            style_rules: vec!["Short stories".to_string()],
            ..Default::default()
        };
        generator.configure(&findings);
        generator.generate("Age Problems").await.expect("should parse");

        let requests = mock_llm.requests.lock().expect("lock not poisoned");
        let system = requests[0].system_prompt().expect("system prompt present");
        assert!(system.contains("Age Problems, Work & Time"));
        assert!(system.contains("Short stories"));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_parse_error() {
        let generator = QuestionGenerator::with_defaults(Arc::new(MockLlmProvider::new(
            "I'm sorry, I can't help with that.",
        )));
        let err = generator.generate("Ratio").await.unwrap_err();
        assert!(matches!(err, AgentError::ResponseParseError(_)));
    }

    #[tokio::test]
    async fn test_service_error_is_llm_error() {
        let generator = QuestionGenerator::with_defaults(Arc::new(MockLlmProvider {
            response: Err("connection reset".to_string()),
            requests: Mutex::new(Vec::new()),
        }));
        let err = generator.generate("Ratio").await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(_)));
    }

    #[tokio::test]
    async fn test_three_options_rejected() {
        let reply = r#"{"story": "Q?", "options": ["1", "2", "3"], "correct_answer_numeric": "1", "correct_option": "1"}"#;
        let generator = QuestionGenerator::with_defaults(Arc::new(MockLlmProvider::new(reply)));
        let err = generator.generate("Ratio").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidCandidate(_)));
    }
}
