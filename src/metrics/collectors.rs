//! High-level recording interface over the raw Prometheus metrics.
//!
//! Every method is a no-op when [`init_metrics`](super::init_metrics) was
//! never called, so library users and tests need no metrics setup.

use super::prometheus::{ATTEMPTS_TOTAL, DEPLOYMENTS_TOTAL, SOLVER_CALLS_TOTAL, SOLVER_LATENCY};

/// Metrics collector for quant-forge operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    /// Record one completed attempt.
    pub fn record_attempt(&self, outcome: &str) {
        if let Some(counter) = ATTEMPTS_TOTAL.get() {
            counter.with_label_values(&[outcome]).inc();
        }
    }

    /// Record one solver call.
    ///
    /// # Arguments
    ///
    /// * `strategy` - Strategy label (e.g., "code", "logic", "skeptic")
    /// * `status` - "answered", "failed" or "timed_out"
    /// * `duration_secs` - Wall-clock time of the call
    pub fn record_solver_call(&self, strategy: &str, status: &str, duration_secs: f64) {
        if let Some(counter) = SOLVER_CALLS_TOTAL.get() {
            counter.with_label_values(&[strategy, status]).inc();
        }
        if let Some(histogram) = SOLVER_LATENCY.get() {
            histogram
                .with_label_values(&[strategy])
                .observe(duration_secs);
        }
    }

    /// Record one deployment attempt.
    pub fn record_deployment(&self, deployed: bool) {
        if let Some(counter) = DEPLOYMENTS_TOTAL.get() {
            let status = if deployed { "deployed" } else { "failed" };
            counter.with_label_values(&[status]).inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{export_metrics, init_metrics};

    #[test]
    fn test_recording_shows_up_in_export() {
        init_metrics().expect("metrics init");
        let collector = MetricsCollector::new();
        collector.record_attempt("DUPLICATE");
        collector.record_solver_call("skeptic", "timed_out", 30.0);
        collector.record_deployment(false);

        let text = export_metrics();
        assert!(text.contains("quant_forge_solver_calls_total"));
        assert!(text.contains("quant_forge_deployments_total"));
    }
}
