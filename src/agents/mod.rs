//! Agents for quant question generation and multi-agent validation.
//!
//! - [`research_agent`] builds the topic catalog from reference material
//! - [`generator`] writes candidate questions for a topic
//! - [`solver_panel`] solves each candidate three independent ways
//! - [`quality_reviewer`] checks grammar before acceptance
//! - [`orchestrator`] runs single attempts and keeps the session statistics

pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod quality_reviewer;
pub mod research_agent;
pub mod session;
pub mod solver_panel;
pub mod types;

pub use error::{AgentError, AgentResult};
pub use generator::{GeneratorConfig, QuestionGenerator};
pub use orchestrator::{AttemptResult, GenerationOrchestrator, OrchestratorConfig, FALLBACK_TOPIC};
pub use quality_reviewer::QualityReviewer;
pub use research_agent::{ResearchAgent, ResearchConfig, ResearchFindings};
pub use session::{RunStatistics, Session};
pub use solver_panel::{
    PanelResult, SolverConfig, SolverOutcome, SolverPanel, SolverStrategy, SOLVER_ERROR_SENTINEL,
};
pub use types::{AcceptedQuestion, CandidateQuestion, SolverTranscripts};
