//! Solver panel: three independent solving strategies run concurrently.
//!
//! Every strategy gets the same problem text and its own system prompt.
//! The panel waits for all three; a failed or timed-out strategy never
//! affects the other two. Downstream validation reads transcripts, where
//! any failure shows up as [`SOLVER_ERROR_SENTINEL`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::metrics::MetricsCollector;
use crate::prompts::{
    build_solve_prompt, CODE_SOLVER_SYSTEM, LOGIC_SOLVER_SYSTEM, SKEPTIC_SOLVER_SYSTEM,
};

use super::types::SolverTranscripts;

/// Transcript recorded for a strategy that produced no answer.
pub const SOLVER_ERROR_SENTINEL: &str = "Error";

/// Default per-call timeout in seconds.
pub const DEFAULT_SOLVER_TIMEOUT_SECS: u64 = 120;

/// Solving strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// Computational: writes code, also prints the core equation.
    Code,
    /// Step-by-step deduction.
    Logic,
    /// Adversarial: looks for flaws, solves by another route.
    Skeptic,
}

impl SolverStrategy {
    pub const ALL: [SolverStrategy; 3] = [
        SolverStrategy::Code,
        SolverStrategy::Logic,
        SolverStrategy::Skeptic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SolverStrategy::Code => "code",
            SolverStrategy::Logic => "logic",
            SolverStrategy::Skeptic => "skeptic",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            SolverStrategy::Code => CODE_SOLVER_SYSTEM,
            SolverStrategy::Logic => LOGIC_SOLVER_SYSTEM,
            SolverStrategy::Skeptic => SKEPTIC_SOLVER_SYSTEM,
        }
    }
}

impl fmt::Display for SolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one solver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutcome {
    Answered(String),
    Failed(String),
    TimedOut,
}

impl SolverOutcome {
    /// Text handed to the validator; failures map to the sentinel.
    pub fn transcript(&self) -> &str {
        match self {
            SolverOutcome::Answered(text) => text,
            SolverOutcome::Failed(_) | SolverOutcome::TimedOut => SOLVER_ERROR_SENTINEL,
        }
    }

    /// Metrics label.
    pub fn status(&self) -> &'static str {
        match self {
            SolverOutcome::Answered(_) => "answered",
            SolverOutcome::Failed(_) => "failed",
            SolverOutcome::TimedOut => "timed_out",
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, SolverOutcome::Answered(_))
    }
}

/// Outcomes of all three strategies for one problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelResult {
    pub code: SolverOutcome,
    pub logic: SolverOutcome,
    pub skeptic: SolverOutcome,
}

impl PanelResult {
    pub fn transcripts(&self) -> SolverTranscripts {
        SolverTranscripts {
            code: self.code.transcript().to_string(),
            logic: self.logic.transcript().to_string(),
            skeptic: self.skeptic.transcript().to_string(),
        }
    }
}

/// Configuration for the Solver Panel.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Model identifier; empty uses the client's default.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Upper bound for each individual solver call.
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.2,
            max_tokens: 2500,
            timeout: Duration::from_secs(DEFAULT_SOLVER_TIMEOUT_SECS),
        }
    }
}

impl SolverConfig {
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Runs the three strategies against one problem.
pub struct SolverPanel {
    llm_client: Arc<dyn LlmProvider>,
    config: SolverConfig,
    metrics: MetricsCollector,
}

impl std::fmt::Debug for SolverPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverPanel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SolverPanel {
    pub fn new(llm_client: Arc<dyn LlmProvider>, config: SolverConfig) -> Self {
        Self {
            llm_client,
            config,
            metrics: MetricsCollector::new(),
        }
    }

    pub fn with_defaults(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self::new(llm_client, SolverConfig::default())
    }

    /// Issues all three strategies at once and waits for every one of them.
    pub async fn solve(&self, problem: &str) -> PanelResult {
        let outcomes = join_all(
            SolverStrategy::ALL
                .iter()
                .map(|strategy| self.solve_with(*strategy, problem)),
        )
        .await;

        let mut outcomes = outcomes.into_iter();
        let mut next = || {
            outcomes
                .next()
                .unwrap_or_else(|| SolverOutcome::Failed("no outcome collected".to_string()))
        };

        PanelResult {
            code: next(),
            logic: next(),
            skeptic: next(),
        }
    }

    /// Runs a single strategy under the configured timeout.
    pub async fn solve_with(&self, strategy: SolverStrategy, problem: &str) -> SolverOutcome {
        let request = GenerationRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(strategy.system_prompt()),
                Message::user(build_solve_prompt(problem)),
            ],
        )
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        let started = Instant::now();
        let outcome =
            match tokio::time::timeout(self.config.timeout, self.llm_client.complete(request)).await
            {
                Ok(Ok(text)) => SolverOutcome::Answered(text),
                Ok(Err(e)) => {
                    tracing::warn!(strategy = %strategy, error = %e, "Solver call failed");
                    SolverOutcome::Failed(e.to_string())
                }
                Err(_) => {
                    tracing::warn!(
                        strategy = %strategy,
                        timeout_secs = self.config.timeout.as_secs_f64(),
                        "Solver call timed out"
                    );
                    SolverOutcome::TimedOut
                }
            };

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics
            .record_solver_call(strategy.label(), outcome.status(), elapsed);
        tracing::debug!(strategy = %strategy, status = outcome.status(), elapsed, "Solver finished");

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::GenerationResponse;
    use async_trait::async_trait;

    /// Answers by strategy, identified from the system prompt.
    struct ScriptedSolvers {
        code: Option<&'static str>,
        logic: Option<&'static str>,
        skeptic: Option<&'static str>,
        stall_skeptic: bool,
    }

    #[async_trait]
    impl LlmProvider for ScriptedSolvers {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            let system = request.system_prompt().unwrap_or_default();
            let reply = if system.contains("Solver A") {
                self.code
            } else if system.contains("Solver B") {
                self.logic
            } else {
                if self.stall_skeptic {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                self.skeptic
            };
            reply
                .map(|text| GenerationResponse::from_text("mock-model", text))
                .ok_or_else(|| LlmError::RequestFailed("solver unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_all_strategies_answer() {
        let panel = SolverPanel::with_defaults(Arc::new(ScriptedSolvers {
            code: Some("EQUATION: t = 360 / 140\n2.57"),
            logic: Some("Relative speed 140.\nFINAL ANSWER: 2.57"),
            skeptic: Some("Estimate ~2.6 hours.\nFINAL ANSWER: 2.57"),
            stall_skeptic: false,
        }));

        let result = panel.solve("Two trains 360 km apart...").await;
        assert!(result.code.is_answered());
        assert!(result.logic.is_answered());
        assert!(result.skeptic.is_answered());
        assert_eq!(result.transcripts().logic, "Relative speed 140.\nFINAL ANSWER: 2.57");
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let panel = SolverPanel::with_defaults(Arc::new(ScriptedSolvers {
            code: Some("42"),
            logic: None,
            skeptic: Some("FINAL ANSWER: 42"),
            stall_skeptic: false,
        }));

        let result = panel.solve("problem").await;
        assert!(result.code.is_answered());
        assert!(matches!(result.logic, SolverOutcome::Failed(_)));
        assert!(result.skeptic.is_answered());

        let transcripts = result.transcripts();
        assert_eq!(transcripts.logic, SOLVER_ERROR_SENTINEL);
        assert_eq!(transcripts.skeptic, "FINAL ANSWER: 42");
    }

    #[tokio::test]
    async fn test_stalled_strategy_times_out() {
        let panel = SolverPanel::new(
            Arc::new(ScriptedSolvers {
                code: Some("42"),
                logic: Some("FINAL ANSWER: 42"),
                skeptic: Some("FINAL ANSWER: 42"),
                stall_skeptic: true,
            }),
            SolverConfig::default().with_timeout(Duration::from_millis(50)),
        );

        let started = Instant::now();
        let result = panel.solve("problem").await;
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(result.skeptic, SolverOutcome::TimedOut);
        assert!(result.code.is_answered());
        assert_eq!(result.skeptic.transcript(), SOLVER_ERROR_SENTINEL);
    }

    /// Every call blocks until all three strategies are in flight.
    struct RendezvousSolvers {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl LlmProvider for RendezvousSolvers {
        async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            self.barrier.wait().await;
            Ok(GenerationResponse::from_text("mock-model", "FINAL ANSWER: 7"))
        }
    }

    #[tokio::test]
    async fn test_strategies_are_dispatched_concurrently() {
        let panel = SolverPanel::new(
            Arc::new(RendezvousSolvers {
                barrier: tokio::sync::Barrier::new(SolverStrategy::ALL.len()),
            }),
            SolverConfig::default().with_timeout(Duration::from_secs(5)),
        );

        let started = Instant::now();
        let result = panel.solve("problem").await;

        assert!(result.code.is_answered());
        assert!(result.logic.is_answered());
        assert!(result.skeptic.is_answered());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_strategy_labels_and_prompts() {
        let labels: Vec<_> = SolverStrategy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["code", "logic", "skeptic"]);
        assert!(SolverStrategy::Code.system_prompt().contains("EQUATION:"));
        assert!(SolverStrategy::Logic.system_prompt().contains("FINAL ANSWER"));
    }
}
