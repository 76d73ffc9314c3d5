//! Heuristic signal blend used as the instinctive fallback score.
//!
//! Four independent `[0, 1]` signals: character-bigram Sørensen–Dice, plus
//! normalized closeness over total length, sentence count, and punctuation
//! count. Blended 0.45/0.20/0.20/0.15.

use std::collections::HashMap;

use crate::constants::{
    CHAR_SIGNAL_WEIGHT, LENGTH_SIGNAL_WEIGHT, PUNCTUATION_SIGNAL_WEIGHT, STRUCTURE_SIGNAL_WEIGHT,
    clamp_unit,
};
use crate::text::{TextDocument, sanitize};

/// Overlapping 2-character windows over the sanitized, space-stripped text.
fn bigrams(text: &str) -> Vec<String> {
    let condensed: String = sanitize(text).chars().filter(|c| *c != ' ').collect();
    let chars: Vec<char> = condensed.chars().collect();

    if chars.len() < 2 {
        return if condensed.is_empty() {
            Vec::new()
        } else {
            vec![condensed]
        };
    }

    chars.windows(2).map(|w| w.iter().collect()).collect()
}

/// Sørensen–Dice coefficient over character-bigram multisets.
///
/// Overlap is a multiset intersection: each bigram occurrence on one side can
/// match at most one occurrence on the other (consume-on-match).
pub fn sorensen_dice(text_a: &str, text_b: &str) -> f64 {
    let bigrams_a = bigrams(text_a);
    let bigrams_b = bigrams(text_b);

    let size_a = bigrams_a.len();
    let size_b = bigrams_b.len();
    if size_a == 0 && size_b == 0 {
        return 1.0;
    }
    if size_a == 0 || size_b == 0 {
        return 0.0;
    }

    let mut counts: HashMap<String, usize> = HashMap::with_capacity(size_a);
    for gram in bigrams_a {
        *counts.entry(gram).or_insert(0) += 1;
    }

    let mut overlap = 0usize;
    for gram in &bigrams_b {
        if let Some(count) = counts.get_mut(gram) {
            overlap += 1;
            if *count == 1 {
                counts.remove(gram);
            } else {
                *count -= 1;
            }
        }
    }

    (2 * overlap) as f64 / (size_a + size_b) as f64
}

/// Normalized closeness of two magnitudes: `1 - |x - y| / max(x, y, 1)`.
pub fn normalized_closeness(x: f64, y: f64) -> f64 {
    let max = x.max(y).max(1.0);
    clamp_unit(1.0 - (x - y).abs() / max)
}

/// The four heuristic signals and their blended fallback score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicSignals {
    pub char_score: f64,
    pub length_score: f64,
    pub structure_score: f64,
    pub punctuation_score: f64,
    pub fallback: f64,
}

impl HeuristicSignals {
    pub fn compute(a: &TextDocument, b: &TextDocument) -> Self {
        let char_score = sorensen_dice(a.raw(), b.raw());
        let length_score = normalized_closeness(a.char_count() as f64, b.char_count() as f64);
        let structure_score =
            normalized_closeness(a.sentence_count() as f64, b.sentence_count() as f64);
        let punctuation_score =
            normalized_closeness(a.punctuation_count() as f64, b.punctuation_count() as f64);

        let fallback = char_score * CHAR_SIGNAL_WEIGHT
            + length_score * LENGTH_SIGNAL_WEIGHT
            + structure_score * STRUCTURE_SIGNAL_WEIGHT
            + punctuation_score * PUNCTUATION_SIGNAL_WEIGHT;

        Self {
            char_score: clamp_unit(char_score),
            length_score: clamp_unit(length_score),
            structure_score: clamp_unit(structure_score),
            punctuation_score: clamp_unit(punctuation_score),
            fallback: clamp_unit(fallback),
        }
    }
}
