//! Prometheus metrics registration and export.
//!
//! Defines every Prometheus metric used by quant-forge and provides
//! functions for initializing and exporting them.

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::{Mutex, OnceLock};

/// Global Prometheus registry for all quant-forge metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Completed attempts, labeled by outcome.
pub static ATTEMPTS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Solver calls, labeled by strategy and status (answered, failed, timed_out).
pub static SOLVER_CALLS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Solver call latency in seconds, labeled by strategy.
pub static SOLVER_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Deployment attempts, labeled by status (deployed, failed).
pub static DEPLOYMENTS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

static INIT_GUARD: Mutex<()> = Mutex::new(());

/// Initialize all metrics and register them with the registry.
///
/// Call once at startup. Subsequent calls are no-ops for the statics.
///
/// # Errors
///
/// Returns a `prometheus::Error` if metric construction or registration fails.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let _guard = INIT_GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let attempts_total = CounterVec::new(
        Opts::new("quant_forge_attempts_total", "Completed generation attempts"),
        &["outcome"],
    )?;

    let solver_calls_total = CounterVec::new(
        Opts::new("quant_forge_solver_calls_total", "Solver strategy invocations"),
        &["strategy", "status"],
    )?;

    let solver_latency = HistogramVec::new(
        HistogramOpts::new(
            "quant_forge_solver_latency_seconds",
            "Solver strategy latency in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["strategy"],
    )?;

    let deployments_total = CounterVec::new(
        Opts::new("quant_forge_deployments_total", "Form deployment attempts"),
        &["status"],
    )?;

    registry.register(Box::new(attempts_total.clone()))?;
    registry.register(Box::new(solver_calls_total.clone()))?;
    registry.register(Box::new(solver_latency.clone()))?;
    registry.register(Box::new(deployments_total.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = ATTEMPTS_TOTAL.set(attempts_total);
    let _ = SOLVER_CALLS_TOTAL.set(solver_calls_total);
    let _ = SOLVER_LATENCY.set(solver_latency);
    let _ = DEPLOYMENTS_TOTAL.set(deployments_total);

    tracing::debug!("Prometheus metrics initialized");

    Ok(())
}

/// Export all registered metrics in Prometheus text format.
pub fn export_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return "# Metrics not initialized. Call init_metrics() first.\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# Error encoding metrics: {}\n", e);
    }

    String::from_utf8(buffer)
        .unwrap_or_else(|e| format!("# Error converting metrics to UTF-8: {}\n", e))
}
