//! CLI command definitions for quant-forge.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crate::agents::{AttemptResult, GenerationOrchestrator, RunStatistics};
use crate::config::ForgeConfig;
use crate::deploy::{DryRunDeployer, FormEndpointDeployer, FormRecord, QuestionDeployer};
use crate::document::ResearchSource;
use crate::metrics::{export_metrics, init_metrics};
use crate::validation::ConsensusValidator;

/// Generate and cross-validate quant multiple-choice questions.
#[derive(Parser)]
#[command(name = "quant-forge")]
#[command(about = "Generate quant word problems validated by a three-solver panel")]
#[command(version)]
#[command(
    long_about = "quant-forge generates multiple-choice quantitative word problems, checks every claimed answer against three independent solvers, and deploys accepted questions to a form endpoint.\n\nExample usage:\n  quant-forge generate --target 5 --output questions.jsonl"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// YAML configuration file.
    #[arg(short, long, global = true, env = "QUANT_FORGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run attempts until the target number of questions is accepted.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Run research only and print the findings as JSON.
    Research(ResearchArgs),

    /// Check a claimed answer against three solver transcripts offline.
    Validate(ValidateArgs),

    /// Send a fixed integration-check record to the form endpoint.
    DeployTest(DeployTestArgs),
}

/// Arguments for the generate command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of accepted questions to produce.
    #[arg(short = 'n', long, default_value = "3")]
    pub target: u64,

    /// Stop after this many attempts (default: 10 x target).
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Reference document for research (PDF, or plain text with form-feed page breaks).
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Append accepted questions to this JSONL file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for topic selection.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Model used for generation (overrides config).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Form endpoint URL (overrides config).
    #[arg(long)]
    pub form_endpoint: Option<String>,

    /// Log accepted questions instead of sending them.
    #[arg(long)]
    pub dry_run: bool,

    /// Pause between attempts in milliseconds.
    #[arg(long, default_value = "1000")]
    pub delay_ms: u64,

    /// Print Prometheus metrics after the run.
    #[arg(long)]
    pub print_metrics: bool,

    /// Output the final statistics as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the research command.
#[derive(Parser, Debug)]
pub struct ResearchArgs {
    /// Reference document; the embedded sample pack is used when omitted.
    #[arg(short, long)]
    pub document: Option<PathBuf>,
}

/// Arguments for the validate command.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Generator's claimed answer.
    #[arg(long, allow_hyphen_values = true)]
    pub claimed: String,

    /// Code solver transcript.
    #[arg(long, allow_hyphen_values = true)]
    pub code: String,

    /// Logic solver transcript.
    #[arg(long, allow_hyphen_values = true)]
    pub logic: String,

    /// Skeptic solver transcript.
    #[arg(long, allow_hyphen_values = true)]
    pub skeptic: String,
}

/// Arguments for the deploy-test command.
#[derive(Parser, Debug)]
pub struct DeployTestArgs {
    /// Form endpoint URL (overrides config).
    #[arg(long)]
    pub form_endpoint: Option<String>,
}

/// Parse CLI arguments and return the Cli struct.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate_command(cli.config, args).await,
        Commands::Research(args) => run_research_command(cli.config, args).await,
        Commands::Validate(args) => run_validate_command(args),
        Commands::DeployTest(args) => run_deploy_test_command(cli.config, args).await,
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ForgeConfig> {
    ForgeConfig::load(path.as_deref()).context("Failed to load configuration")
}

// ============================================================================
// Generate
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateSummary<'a> {
    attempts: u64,
    accepted: u64,
    target: u64,
    statistics: &'a RunStatistics,
}

async fn run_generate_command(config_path: Option<PathBuf>, args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(model) = args.model.clone() {
        config = config.with_generator_model(model);
    }
    if let Some(url) = args.form_endpoint.clone() {
        config = config.with_form_endpoint(url);
    }
    config.validate()?;

    if args.print_metrics {
        init_metrics().context("Failed to initialize metrics")?;
    }

    let llm = Arc::new(config.llm_client()?);
    let deployer = build_deployer(&config, args.dry_run)?;
    let mut orchestrator =
        GenerationOrchestrator::new(llm, deployer, config.orchestrator_config());

    let source = ResearchSource::from_option(args.document.clone());
    let findings = orchestrator.perform_research(&source, false).await;
    if let Some(err) = &findings.error {
        warn!(error = %err, "Research degraded to fallback topics");
    }
    info!(topics = ?orchestrator.topics(), "Starting generation");

    let max_attempts = args.max_attempts.unwrap_or(args.target.saturating_mul(10));
    let mut accepted = 0u64;
    let mut attempts = 0u64;

    while accepted < args.target && attempts < max_attempts {
        if attempts > 0 && args.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }
        attempts += 1;

        match orchestrator.run_attempt().await {
            AttemptResult::Accepted(question) => {
                accepted += 1;
                println!(
                    "[{}/{}] attempt {}: {} [{}]\n  Q: {}\n  Answer: {}",
                    accepted,
                    args.target,
                    attempts,
                    question.question.category,
                    question.question.difficulty,
                    question.question.story,
                    question.question.correct_option
                );
                if let Some(path) = &args.output {
                    append_jsonl(path, &question)?;
                }
            }
            AttemptResult::Rejected { outcome, reason } => {
                println!("attempt {}: rejected ({})", attempts, outcome);
                tracing::debug!(reason = %reason, "Rejection details");
            }
        }
    }

    if accepted < args.target {
        warn!(accepted, target = args.target, attempts, "Attempt limit reached before target");
    }

    let stats = orchestrator.stats();
    if args.json {
        let summary = GenerateSummary {
            attempts,
            accepted,
            target: args.target,
            statistics: stats,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_statistics(stats, attempts);
    }

    if args.print_metrics {
        print!("{}", export_metrics());
    }

    Ok(())
}

fn build_deployer(config: &ForgeConfig, dry_run: bool) -> anyhow::Result<Arc<dyn QuestionDeployer>> {
    match (&config.form_endpoint, dry_run) {
        (Some(url), false) => Ok(Arc::new(FormEndpointDeployer::new(url.clone())?)),
        (None, false) => {
            info!("No form endpoint configured, running dry");
            Ok(Arc::new(DryRunDeployer))
        }
        (_, true) => Ok(Arc::new(DryRunDeployer)),
    }
}

fn append_jsonl<T: Serialize>(path: &PathBuf, value: &T) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{}", serde_json::to_string(value)?)?;
    Ok(())
}

fn print_statistics(stats: &RunStatistics, attempts: u64) {
    println!("\n=== Run Statistics ===");
    for (outcome, count) in stats.iter() {
        println!("{:<18} {}", outcome.as_str(), count);
    }
    println!("{:<18} {}", "TOTAL", attempts);
    println!("Acceptance rate:   {:.1}%", stats.acceptance_rate() * 100.0);
}

// ============================================================================
// Research
// ============================================================================

async fn run_research_command(config_path: Option<PathBuf>, args: ResearchArgs) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let llm = Arc::new(config.llm_client()?);
    let mut orchestrator =
        GenerationOrchestrator::new(llm, Arc::new(DryRunDeployer), config.orchestrator_config());

    let source = ResearchSource::from_option(args.document);
    let findings = orchestrator.perform_research(&source, true).await;
    println!("{}", serde_json::to_string_pretty(findings)?);
    Ok(())
}

// ============================================================================
// Validate
// ============================================================================

fn run_validate_command(args: ValidateArgs) -> anyhow::Result<()> {
    let report =
        ConsensusValidator::new().validate(&args.claimed, &args.code, &args.logic, &args.skeptic);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ============================================================================
// Deploy test
// ============================================================================

async fn run_deploy_test_command(
    config_path: Option<PathBuf>,
    args: DeployTestArgs,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(url) = args.form_endpoint {
        config = config.with_form_endpoint(url);
    }
    let url = config
        .form_endpoint
        .clone()
        .context("No form endpoint configured (set QUANT_FORGE_FORM_ENDPOINT or --form-endpoint)")?;

    let record = FormRecord::integration_check();
    record.check()?;

    let deployer = FormEndpointDeployer::new(url)?;
    info!(url = %deployer.url(), "Sending integration check record");
    deployer.deploy(&record).await?;
    println!("Integration check record accepted by {}", deployer.url());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "quant-forge",
            "generate",
            "--target",
            "5",
            "--seed",
            "42",
            "--dry-run",
            "--output",
            "out.jsonl",
        ])
        .expect("should parse");

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.target, 5);
                assert_eq!(args.seed, Some(42));
                assert!(args.dry_run);
                assert_eq!(args.output, Some(PathBuf::from("out.jsonl")));
                assert_eq!(args.delay_ms, 1000);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_validate_with_negative_claim() {
        let cli = Cli::try_parse_from([
            "quant-forge",
            "validate",
            "--claimed",
            "-4",
            "--code",
            "-4",
            "--logic",
            "FINAL ANSWER: -4",
            "--skeptic",
            "FINAL ANSWER: -4",
        ])
        .expect("should parse");
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_validate_command_runs_offline() {
        let args = ValidateArgs {
            claimed: "50".to_string(),
            code: "50".to_string(),
            logic: "FINAL ANSWER: 50".to_string(),
            skeptic: "FINAL ANSWER: 50".to_string(),
        };
        assert!(run_validate_command(args).is_ok());
    }

    #[test]
    fn test_dry_run_flag_wins_over_endpoint() {
        let config = ForgeConfig::default().with_form_endpoint("http://localhost:9/exec");
        assert!(build_deployer(&config, true).is_ok());
        assert!(build_deployer(&config, false).is_ok());
    }

    #[test]
    fn test_append_jsonl() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("accepted.jsonl");
        append_jsonl(&path, &FormRecord::integration_check()).expect("append");
        append_jsonl(&path, &FormRecord::integration_check()).expect("append");

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content.lines().count(), 2);
    }
}
