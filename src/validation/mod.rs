//! Numeric cross-validation of generated questions.
//!
//! - [`numeric`] turns a free-form transcript into one representative number.
//! - [`consensus`] compares a claimed answer with three solver answers and
//!   classifies any disagreement.

pub mod consensus;
pub mod numeric;

pub use consensus::{ConsensusReport, ConsensusValidator, ExtractedAnswers, Outcome, DEFAULT_TOLERANCE};
pub use numeric::{extract_number, numeric_tokens};
