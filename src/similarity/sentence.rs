//! Bidirectional best-match sentence alignment.
//!
//! Cost is O(|sentences A| · |sentences B|) Jaccard comparisons; article-scale
//! inputs are fine, multi-page corpora belong behind the orchestrator's input
//! bound. Sentences are tokenized once per document before the quadratic pass.

use std::collections::HashSet;

use crate::constants::clamp_unit;
use crate::text::{TextDocument, tokenize};

use super::lexical::{jaccard, word_similarity};

/// Average over `source` sentences of the best Jaccard match in `target`.
fn directional_mean(source: &[HashSet<String>], target: &[HashSet<String>]) -> f64 {
    if source.is_empty() || target.is_empty() {
        return 0.0;
    }

    let total: f64 = source
        .iter()
        .map(|tokens| {
            target
                .iter()
                .map(|candidate| jaccard(tokens, candidate))
                .fold(0.0, f64::max)
        })
        .sum();

    total / source.len() as f64
}

fn sentence_token_sets(doc: &TextDocument) -> Vec<HashSet<String>> {
    doc.sentences()
        .iter()
        .map(|sentence| tokenize(sentence).into_iter().collect())
        .collect()
}

/// Sentence-alignment similarity between two documents.
///
/// For every sentence in A, the best token-set Jaccard match in B is found;
/// those best scores are averaged, the symmetric B→A mean is computed, and
/// the result is the clamped average of the two directions. If either side
/// has no sentences the score degrades to whole-document [`word_similarity`].
pub fn sentence_similarity(a: &TextDocument, b: &TextDocument) -> f64 {
    if a.sentences().is_empty() || b.sentences().is_empty() {
        return word_similarity(a, b);
    }

    let sets_a = sentence_token_sets(a);
    let sets_b = sentence_token_sets(b);

    let score_ab = directional_mean(&sets_a, &sets_b);
    let score_ba = directional_mean(&sets_b, &sets_a);

    clamp_unit((score_ab + score_ba) / 2.0)
}
