//! Analysis-engine metric aggregation.
//!
//! [`ArticleAnalyzer`] runs the word, sentence, and instinctive scores over a
//! document pair and assembles the full [`DiffAnalysis`] payload: per-side
//! profiles, vocabulary stats, the 0.40/0.35/0.25 weighted overall metric,
//! and a human-readable summary.

pub mod types;

pub use types::{
    AnalysisDistribution, ComparedPair, DiffAnalysis, DiffMetrics, ItemProfile, MetricValue,
    SourceTag, Stats, to_percentage,
};

use tracing::debug;

use crate::constants::{
    INSTINCTIVE_WEIGHT, SENTENCE_WEIGHT, SHARED_WORD_SAMPLE_LIMIT, WORD_WEIGHT, clamp_unit,
};
use crate::judge::{InstinctiveScorer, JudgeContext, JudgementProvider};
use crate::similarity::{HeuristicSignals, sentence_similarity, word_similarity};
use crate::text::TextDocument;

/// Inner engine-level overall score: word 0.40, sentence 0.35,
/// instinctive 0.25, clamped.
pub fn overall_similarity(word: f64, sentence: f64, instinctive: f64) -> f64 {
    clamp_unit(word * WORD_WEIGHT + sentence * SENTENCE_WEIGHT + instinctive * INSTINCTIVE_WEIGHT)
}

/// Input to one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub text_a: &'a str,
    pub text_b: &'a str,
    pub title: Option<&'a str>,
}

/// The analysis engine: similarity scores plus payload assembly.
#[derive(Debug)]
pub struct ArticleAnalyzer<P: JudgementProvider> {
    judge: InstinctiveScorer<P>,
}

impl<P: JudgementProvider> ArticleAnalyzer<P> {
    pub fn new(judge: InstinctiveScorer<P>) -> Self {
        Self { judge }
    }

    /// Runs the full analysis. Never fails: the only external call (the
    /// judgement provider) degrades to the heuristic fallback inside the
    /// coordinator.
    pub async fn analyze(&self, input: AnalysisInput<'_>) -> DiffAnalysis {
        let title = input.title.map(str::trim).filter(|t| !t.is_empty());
        let label_a = title
            .map(|t| format!("{t} (A-side)"))
            .unwrap_or_else(|| "Article A".to_string());
        let label_b = title
            .map(|t| format!("{t} (B-side)"))
            .unwrap_or_else(|| "Article B".to_string());

        let doc_a = TextDocument::new(input.text_a);
        let doc_b = TextDocument::new(input.text_b);

        let word_score = word_similarity(&doc_a, &doc_b);
        let sentence_score = sentence_similarity(&doc_a, &doc_b);
        let stats = build_stats(&doc_a, &doc_b);
        let signals = HeuristicSignals::compute(&doc_a, &doc_b);

        debug!(
            word = word_score,
            sentence = sentence_score,
            heuristic_fallback = signals.fallback,
            "Scoring engines complete, requesting instinctive judgement"
        );

        let instinctive_score = self
            .judge
            .score(&JudgeContext {
                text_a: input.text_a,
                text_b: input.text_b,
                label_a: &label_a,
                label_b: &label_b,
                title,
                signals,
                word_similarity: word_score,
                sentence_similarity: sentence_score,
                shared_vocabulary_ratio: stats.shared_word_ratio,
            })
            .await;

        let overall_score = overall_similarity(word_score, sentence_score, instinctive_score);

        let metrics = DiffMetrics {
            word_similarity: MetricValue::new(word_score, "Jaccard word overlap"),
            sentence_similarity: MetricValue::new(sentence_score, "Bidirectional sentence overlap"),
            instinctive_similarity: MetricValue::new(
                instinctive_score,
                "LLM-guided instinctive similarity",
            ),
            overall_similarity: MetricValue::new(overall_score, "Weighted aggregate across metrics"),
        };

        let summary = build_summary(&metrics, &stats, &label_a, &label_b);

        DiffAnalysis {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            compared: ComparedPair {
                a: build_profile(label_a, &doc_a, SourceTag::ASide),
                b: build_profile(label_b, &doc_b, SourceTag::BSide),
            },
            metrics,
            stats,
            summary,
        }
    }
}

fn build_profile(label: String, doc: &TextDocument, source: SourceTag) -> ItemProfile {
    ItemProfile {
        label,
        source,
        word_count: doc.word_count(),
        sentence_count: doc.sentence_count(),
        character_count: doc.char_count(),
        preview: doc.preview(),
        fingerprint: doc.fingerprint(),
    }
}

fn build_stats(doc_a: &TextDocument, doc_b: &TextDocument) -> Stats {
    let set_a = doc_a.token_set();
    let set_b = doc_b.token_set();

    let shared_words: Vec<String> = doc_a
        .unique_tokens()
        .iter()
        .filter(|word| set_b.contains(*word))
        .cloned()
        .collect();
    let unique_to_a: Vec<String> = doc_a
        .unique_tokens()
        .iter()
        .filter(|word| !set_b.contains(*word))
        .cloned()
        .collect();
    let unique_to_b: Vec<String> = doc_b
        .unique_tokens()
        .iter()
        .filter(|word| !set_a.contains(*word))
        .cloned()
        .collect();

    let shared_word_ratio = if set_a.is_empty() && set_b.is_empty() {
        1.0
    } else {
        let union = (set_a.len() + set_b.len() - shared_words.len()).max(1);
        shared_words.len() as f64 / union as f64
    };

    let mut shared_words = shared_words;
    shared_words.truncate(SHARED_WORD_SAMPLE_LIMIT);
    let mut unique_to_a = unique_to_a;
    unique_to_a.truncate(SHARED_WORD_SAMPLE_LIMIT);
    let mut unique_to_b = unique_to_b;
    unique_to_b.truncate(SHARED_WORD_SAMPLE_LIMIT);

    Stats {
        shared_word_ratio: clamp_unit(shared_word_ratio),
        shared_words,
        unique_to_a,
        unique_to_b,
        tokens_a: doc_a.word_count(),
        tokens_b: doc_b.word_count(),
        sentences_a: doc_a.sentence_count(),
        sentences_b: doc_b.sentence_count(),
        char_length_a: doc_a.char_count(),
        char_length_b: doc_b.char_count(),
    }
}

fn build_summary(metrics: &DiffMetrics, stats: &Stats, label_a: &str, label_b: &str) -> String {
    format!(
        "{label_a} and {label_b} share {vocab}% of their core vocabulary. Word overlap scored \
         {word}%, sentence alignment {sentence}%, leading to an overall similarity of {overall}%.",
        vocab = to_percentage(stats.shared_word_ratio),
        word = metrics.word_similarity.percentage,
        sentence = metrics.sentence_similarity.percentage,
        overall = metrics.overall_similarity.percentage,
    )
}
