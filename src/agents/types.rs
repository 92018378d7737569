//! Question types shared by the generator, orchestrator and deployer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AgentError, AgentResult};
use crate::validation::ConsensusReport;

/// Number of answer options on every question.
pub const OPTION_COUNT: usize = 4;

/// Difficulty label used when the generator omits one.
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// A generated multiple-choice question that has not been validated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuestion {
    /// Topic the question was requested for.
    pub category: String,
    /// Problem text.
    pub story: String,
    /// The four answer options, in display order.
    pub options: [String; OPTION_COUNT],
    /// Generator's claimed answer, raw (may carry units).
    pub correct_answer_numeric: String,
    /// Option text marked correct on the form.
    pub correct_option: String,
    /// Difficulty label (Easy / Medium / Hard).
    pub difficulty: String,
}

/// Shape the generation service is asked to produce.
///
/// Numeric-looking fields are accepted as JSON strings or numbers.
#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    category: Option<String>,
    story: String,
    options: Vec<serde_json::Value>,
    correct_answer_numeric: serde_json::Value,
    correct_option: serde_json::Value,
    #[serde(default)]
    difficulty: Option<String>,
}

fn scalar_to_string(field: &str, value: &serde_json::Value) -> AgentResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.trim().to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(AgentError::InvalidCandidate(format!(
            "field '{}' must be a string or number, got {}",
            field, other
        ))),
    }
}

impl CandidateQuestion {
    /// Parse a candidate from the generator's JSON object.
    ///
    /// Fails when required fields are missing, when `story` is blank, or
    /// when there are not exactly four options.
    pub fn from_json(json: &str) -> AgentResult<Self> {
        let raw: RawCandidate = serde_json::from_str(json)
            .map_err(|e| AgentError::ResponseParseError(format!("Invalid JSON: {}", e)))?;

        let story = raw.story.trim().to_string();
        if story.is_empty() {
            return Err(AgentError::InvalidCandidate("story is empty".to_string()));
        }

        if raw.options.len() != OPTION_COUNT {
            return Err(AgentError::InvalidCandidate(format!(
                "expected {} options, got {}",
                OPTION_COUNT,
                raw.options.len()
            )));
        }

        let options = raw
            .options
            .iter()
            .map(|o| scalar_to_string("options", o))
            .collect::<AgentResult<Vec<_>>>()?;
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| AgentError::InvalidCandidate("option count changed".to_string()))?;

        Ok(Self {
            category: raw.category.unwrap_or_default(),
            story,
            options,
            correct_answer_numeric: scalar_to_string(
                "correct_answer_numeric",
                &raw.correct_answer_numeric,
            )?,
            correct_option: scalar_to_string("correct_option", &raw.correct_option)?,
            difficulty: raw
                .difficulty
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        })
    }
}

/// Raw transcripts of the three solver strategies.
///
/// Failed or timed-out strategies carry the `"Error"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverTranscripts {
    pub code: String,
    pub logic: String,
    pub skeptic: String,
}

/// A question that passed consensus and the quality gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedQuestion {
    /// Identifier of the attempt that produced the question.
    pub id: Uuid,
    #[serde(flatten)]
    pub question: CandidateQuestion,
    pub transcripts: SolverTranscripts,
    /// Equation line recovered from the code solver's transcript.
    pub equation_visual: String,
    /// Markdown explanation shown on the form.
    pub explanation: String,
    /// Consensus report that approved the question.
    pub consensus: ConsensusReport,
    pub accepted_at: DateTime<Utc>,
}

/// Equation used when the code transcript carries no equation line.
pub const DEFAULT_EQUATION: &str = "x=y";

/// Maximum characters of the logic transcript quoted in an explanation.
pub const EXPLANATION_LOGIC_LIMIT: usize = 1500;

/// First line after the first `EQUATION:` marker, trimmed.
///
/// Returns [`DEFAULT_EQUATION`] when the marker is missing or the line is empty.
pub fn extract_equation(code_transcript: &str) -> String {
    code_transcript
        .split_once(crate::prompts::EQUATION_MARKER)
        .and_then(|(_, rest)| rest.trim().lines().next())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unwrap_or(DEFAULT_EQUATION)
        .to_string()
}

/// Markdown explanation attached to an accepted question.
pub fn build_explanation(category: &str, equation: &str, logic_transcript: &str) -> String {
    let logic: String = logic_transcript.chars().take(EXPLANATION_LOGIC_LIMIT).collect();
    format!(
        "**Category:** {}\n**Equation:** {}\n\n**Logic:**\n{}",
        category, equation, logic
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "category": "whatever the model picked",
        "story": "Two trains start 360 km apart and travel toward each other at 60 km/h and 80 km/h. After how many hours do they meet?",
        "options": ["2 hours", "2.57 hours", "3 hours", "4 hours"],
        "correct_answer_numeric": 2.57,
        "correct_option": "2.57 hours",
        "difficulty": "Easy"
    }"#;

    #[test]
    fn test_parse_valid_candidate() {
        let candidate = CandidateQuestion::from_json(VALID).expect("should parse");
        assert_eq!(candidate.options[1], "2.57 hours");
        assert_eq!(candidate.correct_answer_numeric, "2.57");
        assert_eq!(candidate.correct_option, "2.57 hours");
        assert_eq!(candidate.difficulty, "Easy");
    }

    #[test]
    fn test_numeric_options_and_missing_difficulty() {
        let json = r#"{"story": "A sum of 840 is divided in the ratio 2:3:4. What is B's share?",
            "options": [240, 280, 320, 360], "correct_answer_numeric": "280", "correct_option": 280}"#;
        let candidate = CandidateQuestion::from_json(json).expect("should parse");
        assert_eq!(candidate.options, ["240", "280", "320", "360"].map(String::from));
        assert_eq!(candidate.correct_option, "280");
        assert_eq!(candidate.difficulty, DEFAULT_DIFFICULTY);
        assert!(candidate.category.is_empty());
    }

    #[test]
    fn test_wrong_option_count() {
        let json = r#"{"story": "Q", "options": ["1", "2", "3"], "correct_answer_numeric": "1", "correct_option": "1"}"#;
        let err = CandidateQuestion::from_json(json).unwrap_err();
        assert!(matches!(err, AgentError::InvalidCandidate(_)));
    }

    #[test]
    fn test_missing_story() {
        let json = r#"{"options": ["1", "2", "3", "4"], "correct_answer_numeric": "1", "correct_option": "1"}"#;
        let err = CandidateQuestion::from_json(json).unwrap_err();
        assert!(matches!(err, AgentError::ResponseParseError(_)));
    }

    #[test]
    fn test_blank_story() {
        let json = r#"{"story": "   ", "options": ["1", "2", "3", "4"], "correct_answer_numeric": "1", "correct_option": "1"}"#;
        assert!(CandidateQuestion::from_json(json).is_err());
    }

    #[test]
    fn test_non_scalar_answer() {
        let json = r#"{"story": "Q", "options": ["1", "2", "3", "4"], "correct_answer_numeric": [1], "correct_option": "1"}"#;
        let err = CandidateQuestion::from_json(json).unwrap_err();
        assert!(matches!(err, AgentError::InvalidCandidate(_)));
    }

    #[test]
    fn test_extract_equation() {
        let transcript = "speed = 120 / 2\nEQUATION:  v = d / t  \nprint(60)\nEQUATION: ignored";
        assert_eq!(extract_equation(transcript), "v = d / t");
    }

    #[test]
    fn test_extract_equation_defaults() {
        assert_eq!(extract_equation("print(60)"), DEFAULT_EQUATION);
        assert_eq!(extract_equation("60\nEQUATION:   "), DEFAULT_EQUATION);
        assert_eq!(extract_equation("Error"), DEFAULT_EQUATION);
    }

    #[test]
    fn test_build_explanation_truncates_logic() {
        let logic = "x".repeat(EXPLANATION_LOGIC_LIMIT + 200);
        let explanation = build_explanation("Work & Time", "1/12 + 1/8 = 5/24", &logic);
        assert!(explanation.starts_with("**Category:** Work & Time\n**Equation:** 1/12 + 1/8 = 5/24\n\n**Logic:**\n"));
        assert_eq!(explanation.matches('x').count(), EXPLANATION_LOGIC_LIMIT);
    }
}
