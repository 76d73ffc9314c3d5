//! Similarity scoring engines.
//!
//! Three independent engines over [`crate::text::TextDocument`] pairs:
//! lexical (token-set metrics), sentence alignment, and the heuristic signal
//! blend used as the instinctive fallback. All scores land in `[0, 1]`.

pub mod heuristic;
pub mod lexical;
pub mod sentence;

pub use heuristic::{HeuristicSignals, normalized_closeness, sorensen_dice};
pub use lexical::{
    LexicalEngine, LexicalError, LexicalReport, TokenLexicalEngine, jaccard, word_similarity,
};
pub use sentence::sentence_similarity;
