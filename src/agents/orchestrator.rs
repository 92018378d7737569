//! Generation Orchestrator - runs one question attempt at a time.
//!
//! An attempt walks a fixed sequence of steps and stops at the first
//! rejection:
//!
//! ```text
//! REQUEST_TOPIC -> GENERATE -> DEDUPE_CHECK -> SOLVE -> VALIDATE -> QUALITY_GATE -> ACCEPT
//!                     |             |                      |             |
//!               PARSING_ERROR   DUPLICATE    HALLUCINATION / CONSENSUS_   QUALITY_FAILURE
//!                                            FAILURE / PARSING_ERROR
//! ```
//!
//! Exactly one outcome is recorded in the session statistics per attempt.
//! The caller decides how many attempts to run; the orchestrator has no
//! notion of a batch. `run_attempt` takes `&mut self`, so attempts on one
//! orchestrator never overlap.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::deploy::{FormRecord, QuestionDeployer};
use crate::document::ResearchSource;
use crate::llm::LlmProvider;
use crate::metrics::MetricsCollector;
use crate::validation::{ConsensusValidator, Outcome};

use super::generator::{GeneratorConfig, QuestionGenerator};
use super::quality_reviewer::QualityReviewer;
use super::research_agent::{ResearchAgent, ResearchConfig, ResearchFindings};
use super::session::{RunStatistics, Session};
use super::solver_panel::{SolverConfig, SolverPanel};
use super::types::{build_explanation, extract_equation, AcceptedQuestion};

/// Topic used when the catalog is empty.
pub const FALLBACK_TOPIC: &str = "General Math";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the Generation Orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub research: ResearchConfig,
    pub generator: GeneratorConfig,
    pub solver: SolverConfig,
    /// Model for the quality review; empty uses the client's default.
    pub reviewer_model: String,
    /// Seed for topic selection; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Topic used when research yields no catalog.
    pub fallback_topic: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            research: ResearchConfig::default(),
            generator: GeneratorConfig::default(),
            solver: SolverConfig::default(),
            reviewer_model: String::new(),
            seed: None,
            fallback_topic: FALLBACK_TOPIC.to_string(),
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_research(mut self, research: ResearchConfig) -> Self {
        self.research = research;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_reviewer_model(mut self, model: impl Into<String>) -> Self {
        self.reviewer_model = model.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fallback_topic(mut self, topic: impl Into<String>) -> Self {
        self.fallback_topic = topic.into();
        self
    }
}

// ============================================================================
// Attempt result
// ============================================================================

/// Result of one attempt.
#[derive(Debug, Clone)]
pub enum AttemptResult {
    Accepted(Box<AcceptedQuestion>),
    Rejected { outcome: Outcome, reason: String },
}

impl AttemptResult {
    pub fn outcome(&self) -> Outcome {
        match self {
            AttemptResult::Accepted(_) => Outcome::Success,
            AttemptResult::Rejected { outcome, .. } => *outcome,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptResult::Accepted(_))
    }

    pub fn accepted(&self) -> Option<&AcceptedQuestion> {
        match self {
            AttemptResult::Accepted(question) => Some(question),
            AttemptResult::Rejected { .. } => None,
        }
    }

    fn rejected(outcome: Outcome, reason: impl Into<String>) -> Self {
        AttemptResult::Rejected {
            outcome,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives research, generation, solving, validation and acceptance.
pub struct GenerationOrchestrator {
    research_agent: ResearchAgent,
    generator: QuestionGenerator,
    solvers: SolverPanel,
    reviewer: QualityReviewer,
    deployer: Arc<dyn QuestionDeployer>,
    validator: ConsensusValidator,
    session: Session,
    findings: Option<ResearchFindings>,
    topics: Vec<String>,
    fallback_topic: String,
    rng: ChaCha8Rng,
    metrics: MetricsCollector,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("topics", &self.topics)
            .field("stats", &self.session.stats)
            .finish_non_exhaustive()
    }
}

impl GenerationOrchestrator {
    /// Builds every agent on top of one LLM client.
    pub fn new(
        llm_client: Arc<dyn LlmProvider>,
        deployer: Arc<dyn QuestionDeployer>,
        config: OrchestratorConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        Self {
            research_agent: ResearchAgent::new(Arc::clone(&llm_client), config.research),
            generator: QuestionGenerator::new(Arc::clone(&llm_client), config.generator),
            solvers: SolverPanel::new(Arc::clone(&llm_client), config.solver),
            reviewer: QualityReviewer::new(llm_client, config.reviewer_model),
            deployer,
            validator: ConsensusValidator::new(),
            session: Session::new(),
            findings: None,
            topics: Vec::new(),
            fallback_topic: config.fallback_topic,
            rng,
            metrics: MetricsCollector::new(),
        }
    }

    /// Runs research when no findings exist yet, when a document is
    /// supplied, or when `force` is set; otherwise keeps the current catalog.
    ///
    /// Research never fails the caller: an unreadable document or an
    /// unparseable reply leaves a one-topic fallback catalog.
    pub async fn perform_research(
        &mut self,
        source: &ResearchSource,
        force: bool,
    ) -> &ResearchFindings {
        let needed = force || source.is_document() || self.findings.is_none();
        if needed {
            tracing::info!(document = source.is_document(), "Researcher is analyzing");
            let findings = match self.research_agent.conduct_research(source).await {
                Ok(findings) => findings,
                Err(e) => {
                    tracing::warn!(error = %e, "Research failed, using fallback topic");
                    ResearchFindings {
                        topics: vec![self.fallback_topic.clone()],
                        error: Some(e.to_string()),
                        ..Default::default()
                    }
                }
            };

            self.topics = findings.topics.clone();
            self.generator.configure(&findings);
            tracing::info!(topics = self.topics.len(), "Topic catalog loaded");
            self.findings = Some(findings);
        }

        self.findings.get_or_insert_with(ResearchFindings::default)
    }

    /// Runs one attempt and records its outcome.
    ///
    /// Researches the embedded reference pack first if no research ran yet.
    pub async fn run_attempt(&mut self) -> AttemptResult {
        if self.findings.is_none() {
            self.perform_research(&ResearchSource::Embedded, false).await;
        }

        let attempt_id = Uuid::new_v4();
        let result = self.attempt(attempt_id).await;
        let outcome = result.outcome();

        self.session.stats.record(outcome);
        self.metrics.record_attempt(outcome.as_str());

        match &result {
            AttemptResult::Accepted(question) => tracing::info!(
                attempt = %attempt_id,
                category = %question.question.category,
                "Question accepted"
            ),
            AttemptResult::Rejected { outcome, reason } => tracing::info!(
                attempt = %attempt_id,
                outcome = %outcome,
                reason = %reason,
                "Question rejected"
            ),
        }

        result
    }

    async fn attempt(&mut self, attempt_id: Uuid) -> AttemptResult {
        let topic = self.choose_topic();

        let candidate = match self.generator.generate(&topic).await {
            Ok(candidate) => candidate,
            Err(e) => {
                return AttemptResult::rejected(Outcome::ParsingError, format!("Invalid JSON: {}", e))
            }
        };

        if self.session.seen.check_and_record(&candidate.story) {
            return AttemptResult::rejected(Outcome::Duplicate, "Similar question exists");
        }

        let panel = self.solvers.solve(&candidate.story).await;
        let transcripts = panel.transcripts();

        let report = self.validator.validate(
            &candidate.correct_answer_numeric,
            &transcripts.code,
            &transcripts.logic,
            &transcripts.skeptic,
        );
        tracing::debug!(attempt = %attempt_id, log = %report.log, "Consensus checked");

        if !report.is_valid {
            let outcome = report.outcome;
            return AttemptResult::rejected(outcome, report.log);
        }

        match self.reviewer.review(&candidate.story).await {
            Ok(true) => {}
            Ok(false) => {
                return AttemptResult::rejected(Outcome::QualityFailure, "Grammar check failed")
            }
            Err(e) => {
                tracing::warn!(attempt = %attempt_id, error = %e, "Quality review unavailable, passing question");
            }
        }

        let equation_visual = extract_equation(&transcripts.code);
        let explanation = build_explanation(&candidate.category, &equation_visual, &transcripts.logic);

        let accepted = AcceptedQuestion {
            id: attempt_id,
            question: candidate,
            transcripts,
            equation_visual,
            explanation,
            consensus: report,
            accepted_at: Utc::now(),
        };

        self.deploy(&accepted).await;
        AttemptResult::Accepted(Box::new(accepted))
    }

    /// Hands an accepted question to the deployer. Failures are logged only.
    async fn deploy(&self, accepted: &AcceptedQuestion) {
        let record = FormRecord::from_accepted(accepted);
        if let Err(e) = record.check() {
            tracing::warn!(attempt = %accepted.id, error = %e, "Deploying record that does not pass the form check");
        }
        let result = self.deployer.deploy(&record).await;

        self.metrics.record_deployment(result.is_ok());
        if let Err(e) = result {
            tracing::warn!(attempt = %accepted.id, error = %e, "Upload failed");
        }
    }

    fn choose_topic(&mut self) -> String {
        self.topics
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| self.fallback_topic.clone())
    }

    /// Clears statistics and the seen-question set. Research is kept.
    pub fn reset_session(&mut self) {
        self.session = Session::new();
        tracing::info!("Session reset");
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.session.stats
    }

    /// Current topic catalog.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}
