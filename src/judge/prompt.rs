//! Judgement prompt construction and defensive response parsing.

use crate::constants::{RATIONALE_MAX_CHARS, clamp_unit};
use crate::similarity::HeuristicSignals;

use super::error::JudgeError;

/// System instruction sent with every judgement request. The provider is told
/// to answer with strict JSON; [`extract_score`] still treats the reply as
/// untrusted free-form text.
pub const JUDGE_SYSTEM_PROMPT: &str = r#"You are an instinctive similarity judge for paired articles.
Estimate an overall "instinctive similarity" score between article A and article B on a 0-1 scale where:
- 0 represents entirely different content, tone, cadence, and structure.
- 0.5 indicates notable thematic overlap but divergent voice/structure.
- 1.0 represents virtually identical cadence, tone, and narrative structure.

You must ONLY return JSON in the following format:
{
  "instinctiveSimilarity": <number between 0 and 1>,
  "confidence": <number between 0 and 1>,
  "rationale": "<one short sentence>"
}

Use the heuristic signals provided as hints, but override them when your qualitative judgement differs."#;

/// Everything the judge needs about one comparison: both texts, display
/// labels, the heuristic signals, and the already-computed lexical context.
#[derive(Debug, Clone, Copy)]
pub struct JudgeContext<'a> {
    pub text_a: &'a str,
    pub text_b: &'a str,
    pub label_a: &'a str,
    pub label_b: &'a str,
    pub title: Option<&'a str>,
    pub signals: HeuristicSignals,
    pub word_similarity: f64,
    pub sentence_similarity: f64,
    pub shared_vocabulary_ratio: f64,
}

/// Builds the user prompt for one judgement request.
pub fn build_prompt(ctx: &JudgeContext<'_>) -> String {
    let title = ctx.title.unwrap_or("Article comparison");

    format!(
        r#"Article A, {label_a} ({title}):
"""
{text_a}
"""

Article B, {label_b} ({title}):
"""
{text_b}
"""

Heuristic signals (0-1):
- Character overlap (dice): {char_score:.3}
- Length balance: {length_score:.3}
- Structural alignment: {structure_score:.3}
- Punctuation cadence: {punctuation_score:.3}
- Aggregated fallback: {fallback:.3}

Semantic context:
- Word similarity: {word:.3}
- Sentence similarity: {sentence:.3}
- Shared vocabulary ratio: {shared:.3}

Judge instinctive similarity holistically and respond with the required JSON only."#,
        label_a = ctx.label_a,
        label_b = ctx.label_b,
        title = title,
        text_a = ctx.text_a,
        text_b = ctx.text_b,
        char_score = ctx.signals.char_score,
        length_score = ctx.signals.length_score,
        structure_score = ctx.signals.structure_score,
        punctuation_score = ctx.signals.punctuation_score,
        fallback = ctx.signals.fallback,
        word = ctx.word_similarity,
        sentence = ctx.sentence_similarity,
        shared = ctx.shared_vocabulary_ratio,
    )
}

/// A parsed judgement score.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeScore {
    /// Clamped to `[0, 1]`.
    pub score: f64,
    pub confidence: Option<f64>,
    pub rationale: Option<String>,
}

/// Extracts a numeric score from free-form provider output.
///
/// Takes the span from the first `{` to the last `}`, parses it as JSON, and
/// accepts `instinctiveSimilarity`, `score`, or `value` as the score field.
pub fn extract_score(raw: &str) -> Result<JudgeScore, JudgeError> {
    let start = raw.find('{').ok_or(JudgeError::MissingJson)?;
    let end = raw.rfind('}').ok_or(JudgeError::MissingJson)?;
    if end <= start {
        return Err(JudgeError::MissingJson);
    }

    let parsed: serde_json::Value = serde_json::from_str(&raw[start..=end])
        .map_err(|e| JudgeError::MalformedJson(e.to_string()))?;

    let score = ["instinctiveSimilarity", "score", "value"]
        .iter()
        .find_map(|field| parsed.get(field).and_then(serde_json::Value::as_f64))
        .filter(|v| v.is_finite())
        .ok_or(JudgeError::NonNumericScore)?;

    let confidence = parsed
        .get("confidence")
        .and_then(serde_json::Value::as_f64)
        .map(clamp_unit);

    let rationale = parsed
        .get("rationale")
        .and_then(serde_json::Value::as_str)
        .map(|s| s.chars().take(RATIONALE_MAX_CHARS).collect());

    Ok(JudgeScore {
        score: clamp_unit(score),
        confidence,
        rationale,
    })
}
