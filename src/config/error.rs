use thiserror::Error;

use crate::constants::WeightGroupError;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment override failed to parse as an integer.
    #[error("invalid {var}: failed to parse `{value}` as an integer")]
    ParseError { var: &'static str, value: String },

    /// A duration or size setting must be positive.
    #[error("{var} must be greater than zero")]
    NotPositive { var: &'static str },

    /// A comparison weight group no longer sums to 1.0.
    #[error(transparent)]
    WeightGroup(#[from] WeightGroupError),
}
