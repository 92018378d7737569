//! Quality Reviewer - a grammar and readability pass over accepted stories.
//!
//! The reviewer only reports a verdict or an error. Whether an error lets
//! the question through is the caller's decision.

use std::sync::Arc;

use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::build_quality_prompt;

use super::error::AgentResult;

/// Token the reply must contain for a passing verdict.
pub const PASS_TOKEN: &str = "PASS";

/// Grammar reviewer backed by an LLM.
pub struct QualityReviewer {
    llm_client: Arc<dyn LlmProvider>,
    model: String,
}

impl std::fmt::Debug for QualityReviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityReviewer")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl QualityReviewer {
    /// Agent name constant for identification.
    pub const AGENT_NAME: &'static str = "quality_reviewer";

    /// `model` may be empty to use the client's default.
    pub fn new(llm_client: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            llm_client,
            model: model.into(),
        }
    }

    /// Returns `true` when the reply contains `PASS`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::LlmError`](super::error::AgentError::LlmError)
    /// when the review call fails.
    pub async fn review(&self, story: &str) -> AgentResult<bool> {
        let request = GenerationRequest::new(
            self.model.clone(),
            vec![Message::user(build_quality_prompt(story))],
        )
        .with_temperature(0.0)
        .with_max_tokens(50);

        let reply = self.llm_client.complete(request).await?;
        let passed = reply.contains(PASS_TOKEN);
        tracing::debug!(passed, reply = %reply, "Quality review");
        Ok(passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::error::AgentError;
    use crate::error::LlmError;
    use crate::llm::GenerationResponse;
    use async_trait::async_trait;

    struct MockLlmProvider(Result<&'static str, ()>);

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            assert!(request.messages[0].content.starts_with("Review grammar."));
            self.0
                .map(|text| GenerationResponse::from_text("mock-model", text))
                .map_err(|_| LlmError::RateLimited("slow down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_pass_verdict() {
        let reviewer = QualityReviewer::new(Arc::new(MockLlmProvider(Ok("PASS"))), "");
        assert!(reviewer.review("A boat travels 12 km.").await.expect("review"));
    }

    #[tokio::test]
    async fn test_fail_verdict() {
        let reviewer = QualityReviewer::new(
            Arc::new(MockLlmProvider(Ok("FAIL - subject/verb disagreement"))),
            "",
        );
        assert!(!reviewer.review("A boats travel 12 km.").await.expect("review"));
    }

    #[tokio::test]
    async fn test_call_failure_is_error() {
        let reviewer = QualityReviewer::new(Arc::new(MockLlmProvider(Err(()))), "");
        let err = reviewer.review("story").await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(_)));
    }
}
