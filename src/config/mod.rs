//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CONCORD_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_JUDGE_TIMEOUT_SECS,
    DEFAULT_MAX_INPUT_CHARS, validate_weight_groups,
};

/// Core configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CONCORD_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache entry time-to-live in seconds. Default: `600`.
    pub cache_ttl_secs: u64,

    /// Max entries in the in-memory cache backend. Default: `10_000`.
    pub cache_capacity: u64,

    /// Judgement model identifier (provider-prefixed, resolved by the genai
    /// client). `None` disables the judgement provider entirely and the
    /// instinctive score is always the heuristic fallback.
    pub judge_model: Option<String>,

    /// Deadline for one judgement-provider call, in seconds. Default: `20`.
    pub judge_timeout_secs: u64,

    /// Upper bound on each input text, in characters. Default: `200_000`.
    pub max_input_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            judge_model: None,
            judge_timeout_secs: DEFAULT_JUDGE_TIMEOUT_SECS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl Config {
    const ENV_CACHE_TTL_SECS: &'static str = "CONCORD_CACHE_TTL_SECS";
    const ENV_CACHE_CAPACITY: &'static str = "CONCORD_CACHE_CAPACITY";
    const ENV_JUDGE_MODEL: &'static str = "CONCORD_JUDGE_MODEL";
    const ENV_JUDGE_TIMEOUT_SECS: &'static str = "CONCORD_JUDGE_TIMEOUT_SECS";
    const ENV_MAX_INPUT_CHARS: &'static str = "CONCORD_MAX_INPUT_CHARS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_ttl_secs =
            Self::parse_positive_u64(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl_secs)?;
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity);
        let judge_model = Self::parse_optional_string(Self::ENV_JUDGE_MODEL);
        let judge_timeout_secs =
            Self::parse_positive_u64(Self::ENV_JUDGE_TIMEOUT_SECS, defaults.judge_timeout_secs)?;
        let max_input_chars =
            Self::parse_u64_from_env(Self::ENV_MAX_INPUT_CHARS, defaults.max_input_chars as u64)
                as usize;

        Ok(Self {
            cache_ttl_secs,
            cache_capacity,
            judge_model,
            judge_timeout_secs,
            max_input_chars,
        })
    }

    /// Re-checks invariants, including that every comparison weight group
    /// still sums to 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::NotPositive {
                var: Self::ENV_CACHE_TTL_SECS,
            });
        }
        if self.judge_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                var: Self::ENV_JUDGE_TIMEOUT_SECS,
            });
        }
        if self.max_input_chars == 0 {
            return Err(ConfigError::NotPositive {
                var: Self::ENV_MAX_INPUT_CHARS,
            });
        }

        validate_weight_groups()?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge_timeout_secs)
    }

    fn parse_positive_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var) {
            Ok(value) => {
                let parsed: u64 = value.parse().map_err(|_| ConfigError::ParseError {
                    var,
                    value: value.clone(),
                })?;
                if parsed == 0 {
                    return Err(ConfigError::NotPositive { var });
                }
                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var: &'static str, default: u64) -> u64 {
        env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_optional_string(var: &'static str) -> Option<String> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
