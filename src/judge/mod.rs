//! Instinctive similarity coordination.
//!
//! [`InstinctiveScorer::score`] is total: with a provider configured it asks
//! for a holistic judgement under a bounded timeout and parses the reply
//! defensively. On any failure (disabled provider, missing credential,
//! transport error, timeout, malformed or non-numeric response) it returns
//! the heuristic fallback score unchanged. Fallback mapping happens in
//! exactly one place, here.

pub mod error;
pub mod prompt;
pub mod provider;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::JudgeError;
pub use prompt::{JUDGE_SYSTEM_PROMPT, JudgeContext, JudgeScore, build_prompt, extract_score};
pub use provider::{GenaiJudge, JudgementProvider};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockJudgementProvider;

use tracing::{debug, warn};

/// Coordinates the judgement provider with the heuristic fallback.
#[derive(Debug)]
pub struct InstinctiveScorer<P: JudgementProvider> {
    provider: Option<P>,
}

impl<P: JudgementProvider> InstinctiveScorer<P> {
    pub fn new(provider: Option<P>) -> Self {
        Self { provider }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces an instinctive similarity score in `[0, 1]`. Never fails.
    pub async fn score(&self, ctx: &JudgeContext<'_>) -> f64 {
        let Some(provider) = &self.provider else {
            debug!("No judgement provider configured, using heuristic fallback");
            return ctx.signals.fallback;
        };

        match Self::fetch(provider, ctx).await {
            Ok(judged) => {
                debug!(
                    score = judged.score,
                    confidence = judged.confidence,
                    "Judgement provider returned a score"
                );
                judged.score
            }
            Err(error) => {
                warn!(%error, "Instinctive judgement failed, using heuristic fallback");
                ctx.signals.fallback
            }
        }
    }

    async fn fetch(provider: &P, ctx: &JudgeContext<'_>) -> Result<JudgeScore, JudgeError> {
        let raw = provider
            .complete(JUDGE_SYSTEM_PROMPT, &build_prompt(ctx))
            .await?;
        extract_score(&raw)
    }
}
