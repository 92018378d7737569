//! Duplicate detection for generated question text.
//!
//! Questions are compared by fingerprint: the text is case-folded,
//! whitespace runs are collapsed to a single space, the ends are trimmed,
//! and the result is hashed with SHA-256. Two questions that differ only in
//! case or spacing share a fingerprint; any change of wording does not.

use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

/// Normalized-content digest of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint the given question text.
    pub fn of(text: &str) -> Self {
        let normalized = normalize(text);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex representation of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase, collapse whitespace runs and trim.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Set of question fingerprints seen during a run.
///
/// Membership only grows; [`DuplicateDetector::reset`] is the only way to
/// forget a question.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    seen: HashSet<Fingerprint>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `text` was seen before, recording it either way.
    pub fn check_and_record(&mut self, text: &str) -> bool {
        !self.seen.insert(Fingerprint::of(text))
    }

    /// Returns whether `text` was seen before without recording it.
    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(&Fingerprint::of(text))
    }

    /// Number of distinct fingerprints recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every fingerprint.
    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  What   is\t2+2?\n"), "what is 2+2?");
    }

    #[test]
    fn test_case_and_whitespace_duplicates() {
        let mut detector = DuplicateDetector::new();
        assert!(!detector.check_and_record("What is 2+2?"));
        assert!(detector.check_and_record("what   is 2+2?"));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_one_word_difference_is_not_duplicate() {
        let mut detector = DuplicateDetector::new();
        assert!(!detector.check_and_record("What is 2+2?"));
        assert!(!detector.check_and_record("What is 2+3?"));
        assert!(!detector.check_and_record("What was 2+2?"));
        assert_eq!(detector.len(), 3);
    }

    #[test]
    fn test_recording_is_unconditional() {
        let mut detector = DuplicateDetector::new();
        detector.check_and_record("A boat travels 12 km downstream");
        assert!(detector.check_and_record("A boat travels 12 km downstream"));
        assert!(detector.check_and_record("A boat travels 12 km downstream"));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_contains_does_not_record() {
        let mut detector = DuplicateDetector::new();
        assert!(!detector.contains("Pipe A fills a tank"));
        assert!(detector.is_empty());
        detector.check_and_record("Pipe A fills a tank");
        assert!(detector.contains("PIPE A FILLS A TANK"));
    }

    #[test]
    fn test_reset() {
        let mut detector = DuplicateDetector::new();
        detector.check_and_record("Q");
        detector.reset();
        assert!(detector.is_empty());
        assert!(!detector.check_and_record("Q"));
    }

    #[test]
    fn test_fingerprint_is_fixed_width() {
        let short = Fingerprint::of("a");
        let long = Fingerprint::of(&"word ".repeat(500));
        assert_eq!(short.as_str().len(), 64);
        assert_eq!(long.as_str().len(), 64);
    }
}
