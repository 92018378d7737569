//! Per-run session state: outcome statistics and the seen-question set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diversity::DuplicateDetector;
use crate::validation::Outcome;

/// Outcome counters for one session.
///
/// Every category is always present. The sum of all counters equals the
/// number of completed attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    counts: BTreeMap<Outcome, u64>,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self {
            counts: Outcome::all().into_iter().map(|o| (o, 0)).collect(),
        }
    }
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Completed attempts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, u64)> + '_ {
        self.counts.iter().map(|(o, n)| (*o, *n))
    }

    /// Share of attempts that were accepted, 0.0 when nothing ran.
    pub fn acceptance_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(Outcome::Success) as f64 / total as f64,
        }
    }
}

/// Mutable state owned by one orchestrator for the duration of a run.
#[derive(Debug, Default)]
pub struct Session {
    pub stats: RunStatistics,
    pub seen: DuplicateDetector,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
