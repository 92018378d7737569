//! Command-line interface for quant-forge.
//!
//! Provides commands for batch generation, research, offline consensus
//! checks and form endpoint checks.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands};
