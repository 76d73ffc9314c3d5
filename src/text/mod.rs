//! Text normalization primitives.
//!
//! Pure functions over raw article text plus [`TextDocument`], the immutable
//! tokenized view every scoring engine consumes. Sanitization is ASCII
//! alphanumeric: any run of other characters becomes a single space.

use std::collections::HashSet;

use crate::constants::PREVIEW_MAX_CHARS;

/// Sentence terminators recognized by [`split_sentences`].
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Punctuation marks counted by the heuristic cadence signal.
pub const PUNCTUATION_MARKS: [char; 6] = [',', ':', ';', '.', '!', '?'];

/// Lowercases `text`, replaces every run of non-alphanumeric characters with
/// a single space, collapses whitespace, and trims.
pub fn sanitize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Splits sanitized text into an ordered sequence of word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    sanitize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits `text` into trimmed sentences: each sentence is a run of
/// non-terminator characters followed by an optional `.`, `!`, or `?`.
///
/// A terminator with no preceding body (e.g. the second `!` in `"a!! b"`) is
/// dropped rather than emitted as an empty sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut push_sentence = |s: &str| {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            sentences.push(trimmed.to_string());
        }
    };

    for c in collapsed.chars() {
        if SENTENCE_TERMINATORS.contains(&c) {
            if !current.is_empty() {
                current.push(c);
                push_sentence(&current);
                current.clear();
            }
        } else {
            current.push(c);
        }
    }
    push_sentence(&current);

    sentences
}

/// Collapses whitespace and truncates to [`PREVIEW_MAX_CHARS`] characters,
/// ellipsis included.
pub fn preview(text: &str) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() <= PREVIEW_MAX_CHARS {
        return cleaned;
    }
    let head: String = cleaned.chars().take(PREVIEW_MAX_CHARS - 3).collect();
    format!("{head}...")
}

/// Hex blake3 fingerprint of the raw content.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// An immutable, pre-tokenized view of one article.
///
/// Construction derives the ordered token sequence, the first-seen unique
/// token order (used for deterministic stats sampling), the token set, and
/// the sentence sequence. Nothing is recomputed afterwards.
#[derive(Debug, Clone)]
pub struct TextDocument {
    raw: String,
    tokens: Vec<String>,
    unique_tokens: Vec<String>,
    token_set: HashSet<String>,
    sentences: Vec<String>,
}

impl TextDocument {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = tokenize(&raw);

        let mut token_set = HashSet::with_capacity(tokens.len());
        let mut unique_tokens = Vec::new();
        for token in &tokens {
            if token_set.insert(token.clone()) {
                unique_tokens.push(token.clone());
            }
        }

        let sentences = split_sentences(&raw);

        Self {
            raw,
            tokens,
            unique_tokens,
            token_set,
            sentences,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Unique tokens in first-seen order.
    pub fn unique_tokens(&self) -> &[String] {
        &self.unique_tokens
    }

    pub fn token_set(&self) -> &HashSet<String> {
        &self.token_set
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn char_count(&self) -> usize {
        self.raw.chars().count()
    }

    /// Count of punctuation marks from the fixed `{,:;.!?}` set.
    pub fn punctuation_count(&self) -> usize {
        self.raw
            .chars()
            .filter(|c| PUNCTUATION_MARKS.contains(c))
            .count()
    }

    pub fn preview(&self) -> String {
        preview(&self.raw)
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.raw)
    }
}
