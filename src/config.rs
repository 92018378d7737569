//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables. CLI flags are applied last by the caller through
//! the `with_*` setters.
//!
//! ```yaml
//! generator_model: google/gemini-2.5-pro
//! solver_timeout_secs: 90
//! form_endpoint: https://script.example.com/exec
//! seed: 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agents::{GeneratorConfig, OrchestratorConfig, ResearchConfig, SolverConfig, FALLBACK_TOPIC};
use crate::error::LlmError;
use crate::llm::{LiteLlmClient, DEFAULT_MODEL, OPENROUTER_API_BASE};

/// Errors raised while loading or checking the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for a quant-forge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// OpenAI-compatible API base. Defaults to OpenRouter.
    pub api_base: Option<String>,
    /// API key. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub generator_model: String,
    pub solver_model: String,
    pub reviewer_model: String,
    pub research_model: String,
    pub generator_temperature: f64,
    pub solver_temperature: f64,
    pub research_temperature: f64,
    /// Upper bound for each solver call.
    pub solver_timeout_secs: u64,
    /// HTTP timeout for every LLM request.
    pub request_timeout_secs: u64,
    /// Form endpoint URL; unset means dry run.
    pub form_endpoint: Option<String>,
    /// Seed for topic selection.
    pub seed: Option<u64>,
    pub fallback_topic: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        let solver = SolverConfig::default();
        let research = ResearchConfig::default();
        Self {
            api_base: None,
            api_key: None,
            generator_model: DEFAULT_MODEL.to_string(),
            solver_model: DEFAULT_MODEL.to_string(),
            reviewer_model: DEFAULT_MODEL.to_string(),
            research_model: DEFAULT_MODEL.to_string(),
            generator_temperature: generator.temperature,
            solver_temperature: solver.temperature,
            research_temperature: research.temperature,
            solver_timeout_secs: solver.timeout.as_secs(),
            request_timeout_secs: 300,
            form_endpoint: None,
            seed: None,
            fallback_topic: FALLBACK_TOPIC.to_string(),
        }
    }
}

impl ForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overlaid with `path` when given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Applies `QUANT_FORGE_*`, `LITELLM_*` and `OPENROUTER_API_KEY` values
    /// returned by `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("LITELLM_API_BASE") {
            self.api_base = Some(base);
        }
        if let Some(key) = lookup("LITELLM_API_KEY").or_else(|| lookup("OPENROUTER_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("LITELLM_DEFAULT_MODEL") {
            self.generator_model = model.clone();
            self.solver_model = model.clone();
            self.reviewer_model = model.clone();
            self.research_model = model;
        }
        if let Some(model) = lookup("QUANT_FORGE_GENERATOR_MODEL") {
            self.generator_model = model;
        }
        if let Some(model) = lookup("QUANT_FORGE_SOLVER_MODEL") {
            self.solver_model = model;
        }
        if let Some(model) = lookup("QUANT_FORGE_REVIEWER_MODEL") {
            self.reviewer_model = model;
        }
        if let Some(model) = lookup("QUANT_FORGE_RESEARCH_MODEL") {
            self.research_model = model;
        }
        if let Some(url) = lookup("QUANT_FORGE_FORM_ENDPOINT") {
            self.form_endpoint = Some(url);
        }
        if let Some(value) = lookup("QUANT_FORGE_SOLVER_TIMEOUT_SECS") {
            self.solver_timeout_secs = parse_env("QUANT_FORGE_SOLVER_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("QUANT_FORGE_SEED") {
            self.seed = Some(parse_env("QUANT_FORGE_SEED", &value)?);
        }
        Ok(self)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_generator_model(mut self, model: impl Into<String>) -> Self {
        self.generator_model = model.into();
        self
    }

    pub fn with_solver_model(mut self, model: impl Into<String>) -> Self {
        self.solver_model = model.into();
        self
    }

    pub fn with_solver_timeout(mut self, secs: u64) -> Self {
        self.solver_timeout_secs = secs;
        self
    }

    pub fn with_form_endpoint(mut self, url: impl Into<String>) -> Self {
        self.form_endpoint = Some(url.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects zero timeouts, empty model names and an empty fallback topic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.solver_timeout_secs == 0 {
            return Err(invalid("solver_timeout_secs", "must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be greater than zero"));
        }
        for (key, model) in [
            ("generator_model", &self.generator_model),
            ("solver_model", &self.solver_model),
            ("reviewer_model", &self.reviewer_model),
            ("research_model", &self.research_model),
        ] {
            if model.trim().is_empty() {
                return Err(invalid(key, "model name must not be empty"));
            }
        }
        if self.fallback_topic.trim().is_empty() {
            return Err(invalid("fallback_topic", "must not be empty"));
        }
        Ok(())
    }

    /// Builds the LLM client. The base falls back to OpenRouter.
    pub fn llm_client(&self) -> Result<LiteLlmClient, LlmError> {
        let api_base = self
            .api_base
            .clone()
            .unwrap_or_else(|| OPENROUTER_API_BASE.to_string());
        if self.api_key.is_none() && api_base == OPENROUTER_API_BASE {
            return Err(LlmError::MissingApiKey);
        }
        LiteLlmClient::with_timeout(
            api_base,
            self.api_key.clone(),
            self.generator_model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::new()
            .with_research(
                ResearchConfig::new()
                    .with_model(self.research_model.clone())
                    .with_temperature(self.research_temperature),
            )
            .with_generator(
                GeneratorConfig::new()
                    .with_model(self.generator_model.clone())
                    .with_temperature(self.generator_temperature),
            )
            .with_solver(
                SolverConfig::new()
                    .with_model(self.solver_model.clone())
                    .with_temperature(self.solver_temperature)
                    .with_timeout(Duration::from_secs(self.solver_timeout_secs)),
            )
            .with_reviewer_model(self.reviewer_model.clone())
            .with_fallback_topic(self.fallback_topic.clone());
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
