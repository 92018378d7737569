//! LLM prompts for question research, generation, solving and review.
//!
//! - [`reference_pack`] - built-in sample questions used as default research input
//! - [`generation`] - research, generator and quality-review prompts
//! - [`solver`] - system prompts for the code, logic and skeptic solvers
//!
//! ```
//! use quant_forge::prompts::{build_generator_system_prompt, build_topic_prompt};
//!
//! let system = build_generator_system_prompt(&["Boats & Streams".to_string()], &[]);
//! assert!(system.contains("Boats & Streams"));
//! assert_eq!(
//!     build_topic_prompt("Boats & Streams"),
//!     "Generate a unique question specifically about: Boats & Streams"
//! );
//! ```

pub mod generation;
pub mod reference_pack;
pub mod solver;

pub use generation::{
    build_generator_system_prompt, build_quality_prompt, build_research_prompt,
    build_topic_prompt, GENERATOR_ROLE, QUALITY_REVIEW_PREFIX, RESEARCH_AGENT_SYSTEM,
    RESEARCH_INPUT_LIMIT,
};
pub use reference_pack::SAMPLE_QUESTION_PACK;
pub use solver::{
    build_solve_prompt, CODE_SOLVER_SYSTEM, EQUATION_MARKER, LOGIC_SOLVER_SYSTEM,
    SKEPTIC_SOLVER_SYSTEM,
};
