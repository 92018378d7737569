//! Diversity guards for generated questions.
//!
//! A run must never accept or even attempt the same question twice. The
//! [`DuplicateDetector`] keeps a content-addressed set of every question
//! text the orchestrator has seen in the current session.
//!
//! ```
//! use quant_forge::diversity::DuplicateDetector;
//!
//! let mut seen = DuplicateDetector::new();
//! assert!(!seen.check_and_record("What is 2+2?"));
//! assert!(seen.check_and_record("what   is 2+2?"));
//! ```

pub mod dedup;

pub use dedup::{normalize, DuplicateDetector, Fingerprint};
