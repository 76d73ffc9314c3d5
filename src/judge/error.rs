use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures inside the judgement-provider path. Every variant is mapped to
/// the heuristic fallback by [`crate::judge::InstinctiveScorer`]; none escape
/// to the orchestrator.
pub enum JudgeError {
    /// No provider configured for this scorer.
    #[error("no judgement provider is configured")]
    Disabled,

    /// The provider call exceeded its deadline.
    #[error("judgement provider call timed out after {0:?}")]
    Timeout(Duration),

    /// Transport or provider-side failure (missing credential included).
    #[error("judgement provider error: {0}")]
    Provider(String),

    /// The response text contained no `{...}` span.
    #[error("judgement response missing JSON payload")]
    MissingJson,

    /// The extracted span failed to parse.
    #[error("judgement response was not valid JSON: {0}")]
    MalformedJson(String),

    /// Parsed JSON carried no numeric score field.
    #[error("judgement response did not include a numeric score")]
    NonNumericScore,
}
