//! Judgement provider collaborators.

use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use crate::config::Config;
use crate::constants::DEFAULT_JUDGE_MAX_TOKENS;

use super::error::JudgeError;

/// Text-completion collaborator: a system instruction plus a user prompt in,
/// free-form text out. The caller owns parsing and fallback.
#[async_trait]
pub trait JudgementProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, JudgeError>;
}

/// Judgement provider backed by the genai multi-provider client. The model
/// string selects the upstream provider; credentials are resolved from the
/// provider's conventional environment variable at call time, so a missing
/// credential surfaces as a provider error (and therefore as the heuristic
/// fallback), never as a panic.
pub struct GenaiJudge {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiJudge")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GenaiJudge {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout,
        }
    }

    /// Builds a judge from configuration. Returns `None` when no judge model
    /// is configured, which puts the coordinator in heuristic-only mode.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .judge_model
            .as_ref()
            .map(|model| Self::new(model, config.judge_timeout()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl JudgementProvider for GenaiJudge {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, JudgeError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(prompt),
        ]);
        let options = ChatOptions::default()
            .with_temperature(0.0)
            .with_max_tokens(DEFAULT_JUDGE_MAX_TOKENS);

        debug!(model = %self.model, "Calling judgement provider");

        // A hanging provider must not stall the orchestrator: the deadline
        // cancels the in-flight call and the coordinator falls back.
        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, Some(&options)),
        )
        .await
        .map_err(|_| JudgeError::Timeout(self.timeout))?
        .map_err(|e| JudgeError::Provider(e.to_string()))?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}
