//! Delivery of accepted questions to the remote quiz form.
//!
//! The form endpoint (a web-app script in front of the quiz form) takes
//! one flat JSON record per question. Deployment outcomes never change
//! whether a question counts as accepted; callers log failures and move on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::agents::types::AcceptedQuestion;
use crate::error::DeployError;

/// Default request timeout for the form endpoint in seconds.
const DEPLOY_TIMEOUT_SECS: u64 = 30;

/// Flat record accepted by the form endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub question: String,
    pub difficulty: String,
    pub category: String,
    pub op1: String,
    pub op2: String,
    pub op3: String,
    pub op4: String,
    #[serde(rename = "correct option")]
    pub correct_option: String,
    #[serde(rename = "explanation of option")]
    pub explanation: String,
}

impl FormRecord {
    pub const DEFAULT_CATEGORY: &'static str = "General Quant";
    pub const DEFAULT_EXPLANATION: &'static str = "Solved by AI.";

    /// Build the record for an accepted question.
    pub fn from_accepted(accepted: &AcceptedQuestion) -> Self {
        let q = &accepted.question;
        let or_default = |value: &str, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        let [op1, op2, op3, op4] = q.options.clone();
        Self {
            question: q.story.clone(),
            difficulty: or_default(&q.difficulty, crate::agents::types::DEFAULT_DIFFICULTY),
            category: or_default(&q.category, Self::DEFAULT_CATEGORY),
            op1,
            op2,
            op3,
            op4,
            correct_option: q.correct_option.clone(),
            explanation: or_default(&accepted.explanation, Self::DEFAULT_EXPLANATION),
        }
    }

    /// Fixed record used to check the endpoint wiring.
    pub fn integration_check() -> Self {
        Self {
            question: "TEST [Integration Check]: If a car travels 100km in 2 hours, what is the speed?"
                .to_string(),
            difficulty: "Easy".to_string(),
            category: Self::DEFAULT_CATEGORY.to_string(),
            op1: "20 km/hr".to_string(),
            op2: "40 km/hr".to_string(),
            op3: "50 km/hr".to_string(),
            op4: "60 km/hr".to_string(),
            correct_option: "50 km/hr".to_string(),
            explanation: "Speed = Distance / Time. Therefore, 100 / 2 = 50.".to_string(),
        }
    }

    /// The correct option must match one of the four options exactly.
    pub fn check(&self) -> Result<(), DeployError> {
        if self.question.trim().is_empty() {
            return Err(DeployError::IncompleteRecord("question is empty".to_string()));
        }
        let options = [&self.op1, &self.op2, &self.op3, &self.op4];
        if !options.iter().any(|o| **o == self.correct_option) {
            return Err(DeployError::IncompleteRecord(format!(
                "correct option '{}' is not one of the options",
                self.correct_option
            )));
        }
        Ok(())
    }
}

/// Destination for accepted questions.
#[async_trait]
pub trait QuestionDeployer: Send + Sync {
    async fn deploy(&self, record: &FormRecord) -> Result<(), DeployError>;
}

/// Posts records as JSON to a form endpoint URL.
#[derive(Debug, Clone)]
pub struct FormEndpointDeployer {
    url: String,
    client: Client,
}

impl FormEndpointDeployer {
    pub fn new(url: impl Into<String>) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEPLOY_TIMEOUT_SECS))
            .build()
            .map_err(|e| DeployError::RequestFailed(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuestionDeployer for FormEndpointDeployer {
    async fn deploy(&self, record: &FormRecord) -> Result<(), DeployError> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| DeployError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeployError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            category = %record.category,
            difficulty = %record.difficulty,
            "Question deployed to form"
        );
        Ok(())
    }
}

/// Logs records instead of sending them. Used when no endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunDeployer;

#[async_trait]
impl QuestionDeployer for DryRunDeployer {
    async fn deploy(&self, record: &FormRecord) -> Result<(), DeployError> {
        tracing::info!(
            question = %record.question,
            correct_option = %record.correct_option,
            "Dry run: question not sent to form"
        );
        Ok(())
    }
}
