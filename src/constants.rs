//! Cross-cutting, shared constants.
//!
//! The comparison weights are treated as fixed configuration across modules
//! (analysis, similarity, compare). Every weight group must sum to 1.0; call
//! [`validate_weight_groups`] at startup (done by `Config::validate`) so an
//! edited weight table fails fast instead of silently skewing scores.

/// Inner (analysis-engine) metric weights.
pub const WORD_WEIGHT: f64 = 0.40;
pub const SENTENCE_WEIGHT: f64 = 0.35;
pub const INSTINCTIVE_WEIGHT: f64 = 0.25;

/// Lexical-engine metric weights.
pub const COSINE_WEIGHT: f64 = 0.25;
pub const TVERSKY_WEIGHT: f64 = 0.35;
pub const OVERLAP_WEIGHT: f64 = 0.40;

/// Outer (system-level) engine weights.
pub const LEXICAL_ENGINE_WEIGHT: f64 = 0.20;
pub const ANALYSIS_ENGINE_WEIGHT: f64 = 0.80;

/// Heuristic fallback signal weights.
pub const CHAR_SIGNAL_WEIGHT: f64 = 0.45;
pub const LENGTH_SIGNAL_WEIGHT: f64 = 0.20;
pub const STRUCTURE_SIGNAL_WEIGHT: f64 = 0.20;
pub const PUNCTUATION_SIGNAL_WEIGHT: f64 = 0.15;

/// Tolerance when checking that a weight group sums to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Tversky asymmetry parameters (symmetric, matching the lexical engine
/// contract).
pub const TVERSKY_ALPHA: f64 = 0.5;
pub const TVERSKY_BETA: f64 = 0.5;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_JUDGE_MAX_TOKENS: u32 = 512;

/// Upper bound on each input text, checked at the request boundary. Sentence
/// alignment is quadratic in sentence count, so oversized inputs are rejected
/// instead of stalling the orchestrator.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 200_000;

/// Profile previews are truncated to this many characters (ellipsis included).
pub const PREVIEW_MAX_CHARS: usize = 240;

/// Shared/unique word samples in [`crate::analysis::Stats`] are capped here.
pub const SHARED_WORD_SAMPLE_LIMIT: usize = 25;

/// Judge rationale strings are truncated to this many characters.
pub const RATIONALE_MAX_CHARS: usize = 280;

/// Clamps a score into `[0, 1]`. NaN clamps to 0 so a poisoned intermediate
/// value cannot leak out of a metric.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Error returned when a weight group does not sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightGroupError {
    /// Name of the offending group.
    pub group: &'static str,
    /// The actual sum observed.
    pub sum: f64,
}

impl std::fmt::Display for WeightGroupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "weight group `{}` sums to {} (expected 1.0 ±{})",
            self.group, self.sum, WEIGHT_SUM_TOLERANCE
        )
    }
}

impl std::error::Error for WeightGroupError {}

/// Validates that every configured weight group sums to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`].
pub fn validate_weight_groups() -> Result<(), WeightGroupError> {
    let groups: [(&'static str, &[f64]); 4] = [
        (
            "analysis",
            &[WORD_WEIGHT, SENTENCE_WEIGHT, INSTINCTIVE_WEIGHT],
        ),
        ("lexical", &[COSINE_WEIGHT, TVERSKY_WEIGHT, OVERLAP_WEIGHT]),
        ("engine", &[LEXICAL_ENGINE_WEIGHT, ANALYSIS_ENGINE_WEIGHT]),
        (
            "heuristic",
            &[
                CHAR_SIGNAL_WEIGHT,
                LENGTH_SIGNAL_WEIGHT,
                STRUCTURE_SIGNAL_WEIGHT,
                PUNCTUATION_SIGNAL_WEIGHT,
            ],
        ),
    ];

    for (group, weights) in groups {
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightGroupError { group, sum });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_groups_sum_to_one() {
        assert!(validate_weight_groups().is_ok());
    }

    #[test]
    fn test_analysis_weights_exact() {
        let sum = WORD_WEIGHT + SENTENCE_WEIGHT + INSTINCTIVE_WEIGHT;
        assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_lexical_weights_exact() {
        let sum = COSINE_WEIGHT + TVERSKY_WEIGHT + OVERLAP_WEIGHT;
        assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_engine_weights_exact() {
        let sum = LEXICAL_ENGINE_WEIGHT + ANALYSIS_ENGINE_WEIGHT;
        assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_heuristic_weights_exact() {
        let sum = CHAR_SIGNAL_WEIGHT
            + LENGTH_SIGNAL_WEIGHT
            + STRUCTURE_SIGNAL_WEIGHT
            + PUNCTUATION_SIGNAL_WEIGHT;
        assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(0.0), 0.0);
        assert_eq!(clamp_unit(0.42), 0.42);
        assert_eq!(clamp_unit(1.0), 1.0);
        assert_eq!(clamp_unit(1.7), 1.0);
    }

    #[test]
    fn test_clamp_unit_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_weight_group_error_display() {
        let err = WeightGroupError {
            group: "analysis",
            sum: 0.9,
        };
        assert!(err.to_string().contains("analysis"));
        assert!(err.to_string().contains("0.9"));
    }
}
