//! Wire types for the analysis payload. Field names serialize in camelCase to
//! match the published JSON contract.

use serde::{Deserialize, Serialize};

use crate::constants::clamp_unit;

/// Rounds a unit score to a percentage with two decimals.
pub fn to_percentage(value: f64) -> f64 {
    (clamp_unit(value) * 100.0 * 100.0).round() / 100.0
}

/// A single published metric. `percentage` is always
/// `round(value * 100, 2)`; construct through [`MetricValue::new`] to keep
/// the invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub value: f64,
    pub percentage: f64,
    pub technique: String,
}

impl MetricValue {
    pub fn new(value: f64, technique: impl Into<String>) -> Self {
        let value = clamp_unit(value);
        Self {
            value,
            percentage: to_percentage(value),
            technique: technique.into(),
        }
    }
}

/// Which side of the comparison a profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    ASide,
    BSide,
}

/// Profile of one compared article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProfile {
    pub label: String,
    pub source: SourceTag,
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub preview: String,
    pub fingerprint: String,
}

/// Vocabulary and size statistics over both sides. Word samples are capped
/// at [`crate::constants::SHARED_WORD_SAMPLE_LIMIT`] entries in first-seen
/// order; the ratio is computed over the full sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub shared_word_ratio: f64,
    pub shared_words: Vec<String>,
    pub unique_to_a: Vec<String>,
    pub unique_to_b: Vec<String>,
    pub tokens_a: usize,
    pub tokens_b: usize,
    pub sentences_a: usize,
    pub sentences_b: usize,
    pub char_length_a: usize,
    pub char_length_b: usize,
}

/// The four published analysis metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetrics {
    pub word_similarity: MetricValue,
    pub sentence_similarity: MetricValue,
    pub instinctive_similarity: MetricValue,
    pub overall_similarity: MetricValue,
}

/// Bare numeric view of [`DiffMetrics`], used in the aggregate response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDistribution {
    pub word_similarity: f64,
    pub sentence_similarity: f64,
    pub instinctive_similarity: f64,
    pub overall_similarity: f64,
}

/// Both compared profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedPair {
    pub a: ItemProfile,
    pub b: ItemProfile,
}

/// One complete comparison analysis. Immutable once constructed; it lives for
/// the request/response cycle plus whatever TTL the cache grants it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffAnalysis {
    pub id: String,
    pub created_at: String,
    pub compared: ComparedPair,
    pub metrics: DiffMetrics,
    pub stats: Stats,
    pub summary: String,
}

impl DiffAnalysis {
    pub fn distribution(&self) -> AnalysisDistribution {
        AnalysisDistribution {
            word_similarity: self.metrics.word_similarity.value,
            sentence_similarity: self.metrics.sentence_similarity.value,
            instinctive_similarity: self.metrics.instinctive_similarity.value,
            overall_similarity: self.metrics.overall_similarity.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_value_percentage_invariant() {
        let metric = MetricValue::new(0.123456, "test");
        assert_eq!(metric.percentage, 12.35);

        let metric = MetricValue::new(1.0, "test");
        assert_eq!(metric.percentage, 100.0);

        let metric = MetricValue::new(0.0, "test");
        assert_eq!(metric.percentage, 0.0);
    }

    #[test]
    fn test_metric_value_clamps_before_rounding() {
        let metric = MetricValue::new(1.5, "test");
        assert_eq!(metric.value, 1.0);
        assert_eq!(metric.percentage, 100.0);
    }

    #[test]
    fn test_source_tag_wire_names() {
        assert_eq!(serde_json::to_string(&SourceTag::ASide).unwrap(), "\"a-side\"");
        assert_eq!(serde_json::to_string(&SourceTag::BSide).unwrap(), "\"b-side\"");
    }

    #[test]
    fn test_metric_serializes_camel_case() {
        let json = serde_json::to_value(MetricValue::new(0.5, "Jaccard word overlap")).unwrap();
        assert_eq!(json["value"], 0.5);
        assert_eq!(json["percentage"], 50.0);
        assert_eq!(json["technique"], "Jaccard word overlap");
    }
}
