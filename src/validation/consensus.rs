//! Cross-validation of a claimed answer against three solver transcripts.
//!
//! The claimed answer comes from the question generator; the three
//! transcripts come from independently prompted solvers (code, logic,
//! skeptic). Disagreement is classified:
//!
//! | Extraction | Solvers agree | Claim matches solver A | Outcome             |
//! |------------|---------------|------------------------|---------------------|
//! | any none   | -             | -                      | `ParsingError`      |
//! | all some   | yes           | yes                    | `Success`           |
//! | all some   | yes           | no                     | `Hallucination`     |
//! | all some   | no            | -                      | `ConsensusFailure`  |
//!
//! "Solvers agree" compares A with B and B with C only. A and C are never
//! compared directly, so with the absolute tolerance two solvers up to
//! almost twice the tolerance apart can still count as agreeing. The
//! tolerance is absolute as well, which makes the check increasingly lax
//! relative to the magnitude of large answers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::numeric::extract_number;

/// Absolute tolerance for two answers to count as equal.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Outcome category of an attempt.
///
/// The validator itself only produces `Success`, `ParsingError`,
/// `Hallucination` and `ConsensusFailure`; the orchestrator adds
/// `Duplicate` and `QualityFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Hallucination,
    ConsensusFailure,
    ParsingError,
    Duplicate,
    QualityFailure,
}

impl Outcome {
    /// Every outcome category, in reporting order.
    pub fn all() -> [Outcome; 6] {
        [
            Outcome::Success,
            Outcome::Hallucination,
            Outcome::ConsensusFailure,
            Outcome::ParsingError,
            Outcome::Duplicate,
            Outcome::QualityFailure,
        ]
    }

    /// Stable label used in statistics and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Hallucination => "HALLUCINATION",
            Outcome::ConsensusFailure => "CONSENSUS_FAILURE",
            Outcome::ParsingError => "PARSING_ERROR",
            Outcome::Duplicate => "DUPLICATE",
            Outcome::QualityFailure => "QUALITY_FAILURE",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted values of the four inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAnswers {
    pub claimed: Option<f64>,
    pub code: Option<f64>,
    pub logic: Option<f64>,
    pub skeptic: Option<f64>,
}

impl ExtractedAnswers {
    fn all_present(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.claimed?, self.code?, self.logic?, self.skeptic?))
    }
}

/// Result of a consensus check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// Whether the claimed answer is backed by all three solvers.
    pub is_valid: bool,
    /// Outcome category.
    pub outcome: Outcome,
    /// Extracted numeric values.
    pub answers: ExtractedAnswers,
    /// Human-readable diagnostic.
    pub log: String,
}

fn fmt_value(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "None".to_string())
}

/// Validator comparing a claimed answer with three solver transcripts.
#[derive(Debug, Clone, Copy)]
pub struct ConsensusValidator {
    tolerance: f64,
}

impl Default for ConsensusValidator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ConsensusValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the absolute tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validate a claimed answer against the code, logic and skeptic transcripts.
    ///
    /// Pure with respect to its inputs: validating the same four strings
    /// twice yields the same report.
    pub fn validate(&self, claimed: &str, code: &str, logic: &str, skeptic: &str) -> ConsensusReport {
        let answers = ExtractedAnswers {
            claimed: extract_number(Some(claimed)),
            code: extract_number(Some(code)),
            logic: extract_number(Some(logic)),
            skeptic: extract_number(Some(skeptic)),
        };

        let comparison = format!(
            "COMPARISON: Gen[{}] | Code[{}] | Logic[{}] | Skeptic[{}]",
            fmt_value(answers.claimed),
            fmt_value(answers.code),
            fmt_value(answers.logic),
            fmt_value(answers.skeptic),
        );

        let Some((n_gen, n_a, n_b, n_c)) = answers.all_present() else {
            return ConsensusReport {
                is_valid: false,
                outcome: Outcome::ParsingError,
                answers,
                log: format!("{} -> Fail: Parsing Error", comparison),
            };
        };

        let within = |x: f64, y: f64| (x - y).abs() < self.tolerance;
        let solvers_agree = within(n_a, n_b) && within(n_b, n_c);
        let all_agree = solvers_agree && within(n_gen, n_a);

        let (is_valid, outcome, verdict) = if all_agree {
            (true, Outcome::Success, "Unanimous")
        } else if solvers_agree {
            (false, Outcome::Hallucination, "Fail: Generator Hallucination")
        } else {
            (false, Outcome::ConsensusFailure, "Fail: Solvers Disagree")
        };

        ConsensusReport {
            is_valid,
            outcome,
            answers,
            log: format!("{} -> {}", comparison, verdict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(gen: &str, a: &str, b: &str, c: &str) -> ConsensusReport {
        ConsensusValidator::new().validate(gen, a, b, c)
    }

    #[test]
    fn test_unanimous_success() {
        let report = check("10", "10", "10", "10");
        assert!(report.is_valid);
        assert_eq!(report.outcome, Outcome::Success);
        assert!(report.log.contains("Unanimous"));
    }

    #[test]
    fn test_hallucination() {
        let report = check("15", "10", "10.05", "9.98");
        assert!(!report.is_valid);
        assert_eq!(report.outcome, Outcome::Hallucination);
    }

    #[test]
    fn test_consensus_failure() {
        let report = check("10", "10", "20", "30");
        assert!(!report.is_valid);
        assert_eq!(report.outcome, Outcome::ConsensusFailure);
    }

    #[test]
    fn test_parsing_error_on_unparseable_solver() {
        let report = check("10", "Error", "10", "10");
        assert!(!report.is_valid);
        assert_eq!(report.outcome, Outcome::ParsingError);
        assert_eq!(report.answers.code, None);
        assert!(report.log.contains("Code[None]"));
    }

    #[test]
    fn test_parsing_error_on_unparseable_claim() {
        let report = check("", "10", "10", "10");
        assert_eq!(report.outcome, Outcome::ParsingError);
    }

    #[test]
    fn test_transcripts_use_final_answer() {
        let report = check(
            "3 hours",
            "distance = 360\nspeed = 60 + 80\nprint(360/140)\nEQUATION: t = 360 / (60 + 80)\n2.5714",
            "Step 1. Combined speed is 140 km/h.\nStep 2. 360/140 = 2.57\nFINAL ANSWER: 2.57",
            "Checking edge cases... none.\nFINAL ANSWER: 2.6",
        );
        assert_eq!(report.outcome, Outcome::Hallucination);
    }

    #[test]
    fn test_a_versus_c_not_compared() {
        // A and C are 0.18 apart but each is within tolerance of B.
        let report = check("5.0", "5.0", "5.09", "5.18");
        assert_eq!(report.outcome, Outcome::Success);
    }

    #[test]
    fn test_tolerance_is_strict() {
        let report = check("0", "0", "0.1", "0.1");
        assert_eq!(report.outcome, Outcome::ConsensusFailure);
    }

    #[test]
    fn test_idempotent() {
        let validator = ConsensusValidator::new();
        let first = validator.validate("15", "10", "10.05", "9.98");
        let second = validator.validate("15", "10", "10.05", "9.98");
        assert_eq!(first, second);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::ConsensusFailure.to_string(), "CONSENSUS_FAILURE");
        let json = serde_json::to_string(&Outcome::QualityFailure).expect("serialize");
        assert_eq!(json, "\"QUALITY_FAILURE\"");
        assert_eq!(Outcome::all().len(), 6);
    }
}
