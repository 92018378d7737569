//! Prometheus metrics for quant-forge runs.
//!
//! ```ignore
//! use quant_forge::metrics::{export_metrics, init_metrics, MetricsCollector};
//!
//! init_metrics()?;
//! MetricsCollector::new().record_attempt("SUCCESS");
//! println!("{}", export_metrics());
//! ```

pub mod collectors;
pub mod prometheus;

pub use collectors::MetricsCollector;
pub use prometheus::{
    export_metrics, init_metrics, ATTEMPTS_TOTAL, DEPLOYMENTS_TOTAL, REGISTRY,
    SOLVER_CALLS_TOTAL, SOLVER_LATENCY,
};
