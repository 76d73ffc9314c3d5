use thiserror::Error;

use super::types::CompareFailure;

#[derive(Debug, Clone, PartialEq, Error)]
/// Failures the orchestrator propagates to the requester. Everything else
/// (cache trouble, judgement-provider trouble) is swallowed at its own
/// boundary and never reaches here.
pub enum CompareError {
    /// Required input missing or out of bounds; no engine was invoked.
    #[error("invalid comparison input: {reason}")]
    Validation { reason: String },

    /// An engine branch yielded no usable metrics; no partial payload exists.
    #[error("comparison computation failed: {reason}")]
    Compute { reason: String },

    /// A directly-called collaborator (e.g. the asset recorder) failed.
    #[error("upstream collaborator failed: {reason}")]
    Upstream { reason: String },
}

impl CompareError {
    /// The structured `{status: false, message}` failure payload.
    pub fn to_failure(&self) -> CompareFailure {
        CompareFailure {
            status: false,
            message: self.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CompareError::Validation { .. })
    }
}
