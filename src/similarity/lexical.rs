//! Lexical similarity over word token sets and bags.
//!
//! [`word_similarity`] is the Jaccard index the analysis engine consumes.
//! [`LexicalReport`] is the independent lexical-engine collaborator output:
//! cosine over token bags, symmetric Tversky, and the overlap coefficient,
//! blended 0.25/0.35/0.40.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use thiserror::Error;

use crate::constants::{
    COSINE_WEIGHT, OVERLAP_WEIGHT, TVERSKY_ALPHA, TVERSKY_BETA, TVERSKY_WEIGHT, clamp_unit,
};
use crate::text::TextDocument;

#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("lexical computation failed: {reason}")]
    ComputationFailed { reason: String },
}

/// Jaccard index over two token sets.
///
/// Edge cases: both empty is a perfect match (1.0); exactly one empty is a
/// total mismatch (0.0).
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.iter().filter(|token| b.contains(*token)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Word-set Jaccard similarity between two documents. Symmetric.
pub fn word_similarity(a: &TextDocument, b: &TextDocument) -> f64 {
    jaccard(a.token_set(), b.token_set())
}

fn token_bag(doc: &TextDocument) -> HashMap<&str, f64> {
    let mut bag: HashMap<&str, f64> = HashMap::with_capacity(doc.unique_tokens().len());
    for token in doc.tokens() {
        *bag.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    bag
}

/// Cosine similarity over token frequency bags.
pub fn cosine_similarity(a: &TextDocument, b: &TextDocument) -> f64 {
    let bag_a = token_bag(a);
    let bag_b = token_bag(b);

    if bag_a.is_empty() && bag_b.is_empty() {
        return 1.0;
    }
    if bag_a.is_empty() || bag_b.is_empty() {
        return 0.0;
    }

    let dot: f64 = bag_a
        .iter()
        .filter_map(|(token, count)| bag_b.get(token).map(|other| count * other))
        .sum();
    let norm_a: f64 = bag_a.values().map(|c| c * c).sum::<f64>().sqrt();
    let norm_b: f64 = bag_b.values().map(|c| c * c).sum::<f64>().sqrt();

    clamp_unit(dot / (norm_a * norm_b))
}

/// Symmetric Tversky index (α = β = 0.5) over token sets.
pub fn tversky_similarity(a: &TextDocument, b: &TextDocument) -> f64 {
    let set_a = a.token_set();
    let set_b = b.token_set();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.iter().filter(|t| set_b.contains(*t)).count() as f64;
    let only_a = set_a.len() as f64 - intersection;
    let only_b = set_b.len() as f64 - intersection;

    clamp_unit(intersection / (intersection + TVERSKY_ALPHA * only_a + TVERSKY_BETA * only_b))
}

/// Overlap coefficient over token sets.
pub fn overlap_coefficient(a: &TextDocument, b: &TextDocument) -> f64 {
    let set_a = a.token_set();
    let set_b = b.token_set();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.iter().filter(|t| set_b.contains(*t)).count() as f64;
    clamp_unit(intersection / set_a.len().min(set_b.len()) as f64)
}

/// Lexical-engine score distribution.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalReport {
    pub cosine_similarity: f64,
    pub tversky_similarity: f64,
    pub overlap_coefficient: f64,
    pub overall_similarity: f64,
}

impl LexicalReport {
    /// Returns `true` when every metric is a finite number. A report failing
    /// this check counts as "no usable metrics" for the orchestrator.
    pub fn is_usable(&self) -> bool {
        [
            self.cosine_similarity,
            self.tversky_similarity,
            self.overlap_coefficient,
            self.overall_similarity,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Lexical engine collaborator contract: an independent score distribution
/// over the same two texts, consumed by the orchestrator as the 20% outer
/// branch.
#[async_trait]
pub trait LexicalEngine: Send + Sync {
    async fn compute(&self, text_a: &str, text_b: &str) -> Result<LexicalReport, LexicalError>;
}

/// Default in-process lexical engine over sanitized word tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenLexicalEngine;

impl TokenLexicalEngine {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core shared by the trait impl and direct callers.
    pub fn report(&self, a: &TextDocument, b: &TextDocument) -> LexicalReport {
        let cosine = cosine_similarity(a, b);
        let tversky = tversky_similarity(a, b);
        let overlap = overlap_coefficient(a, b);

        LexicalReport {
            cosine_similarity: cosine,
            tversky_similarity: tversky,
            overlap_coefficient: overlap,
            overall_similarity: clamp_unit(
                cosine * COSINE_WEIGHT + tversky * TVERSKY_WEIGHT + overlap * OVERLAP_WEIGHT,
            ),
        }
    }
}

#[async_trait]
impl LexicalEngine for TokenLexicalEngine {
    async fn compute(&self, text_a: &str, text_b: &str) -> Result<LexicalReport, LexicalError> {
        let doc_a = TextDocument::new(text_a);
        let doc_b = TextDocument::new(text_b);
        Ok(self.report(&doc_a, &doc_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(a: &str, b: &str) -> (TextDocument, TextDocument) {
        (TextDocument::new(a), TextDocument::new(b))
    }

    #[test]
    fn test_jaccard_identical() {
        let (a, b) = docs("the quick brown fox", "the quick brown fox");
        assert_eq!(word_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint() {
        let (a, b) = docs("alpha beta", "gamma delta");
        assert_eq!(word_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // {apple, inc} vs {apple}: intersection 1, union 2.
        let (a, b) = docs("apple inc", "apple");
        assert!((word_similarity(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_both_empty_is_one() {
        let (a, b) = docs("", "");
        assert_eq!(word_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_jaccard_one_empty_is_zero() {
        let (a, b) = docs("something", "");
        assert_eq!(word_similarity(&a, &b), 0.0);
        assert_eq!(word_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_jaccard_symmetry() {
        let (a, b) = docs("shared words here", "shared words there");
        assert_eq!(word_similarity(&a, &b), word_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_identical() {
        let (a, b) = docs("one two two three", "one two two three");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_disjoint() {
        let (a, b) = docs("one two", "three four");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_tversky_symmetric_parameters() {
        let (a, b) = docs("alpha beta gamma", "beta gamma delta");
        assert!((tversky_similarity(&a, &b) - tversky_similarity(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_subset_is_one() {
        let (a, b) = docs("alpha beta", "alpha beta gamma delta");
        assert!((overlap_coefficient(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_engine_report_in_unit_range() {
        let engine = TokenLexicalEngine::new();
        let report = engine
            .compute("the quick brown fox", "a quick brown dog")
            .await
            .unwrap();

        for value in [
            report.cosine_similarity,
            report.tversky_similarity,
            report.overlap_coefficient,
            report.overall_similarity,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
        assert!(report.is_usable());
    }

    #[tokio::test]
    async fn test_engine_identical_texts_score_one() {
        let engine = TokenLexicalEngine::new();
        let report = engine.compute("same text here.", "same text here.").await.unwrap();
        assert!((report.overall_similarity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_report_serde_round_trip_camel_case() {
        let report = LexicalReport {
            cosine_similarity: 0.25,
            tversky_similarity: 0.5,
            overlap_coefficient: 0.75,
            overall_similarity: 0.5375,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("cosineSimilarity"));
        assert!(json.contains("overlapCoefficient"));
        let back: LexicalReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
