//! Concord library crate: similarity scoring for paired articles.
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Orchestration
//! - [`CompareService`] - validate → cache → concurrent engines → aggregate
//! - [`CompareRequest`], [`CompareResponse`], [`CompareError`] - the
//!   request/response contract
//! - [`SingleFlight`] - stampede protection keyed by content fingerprint
//!
//! ## Scoring Engines
//! - [`TokenLexicalEngine`], [`LexicalReport`] - cosine/Tversky/overlap
//!   distribution (the 20% outer branch)
//! - [`word_similarity`], [`sentence_similarity`], [`HeuristicSignals`] -
//!   the analysis-engine primitives
//! - [`ArticleAnalyzer`], [`DiffAnalysis`] - full analysis payload assembly
//!
//! ## Instinctive Judgement
//! - [`InstinctiveScorer`], [`GenaiJudge`], [`JudgementProvider`] - holistic
//!   scoring with a guaranteed heuristic fallback
//!
//! ## Cache
//! - [`CompareCache`], [`MemoryBackend`], [`CacheBucket`] - content-addressed
//!   result cache, never-fail semantics
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `CONCORD_*` environment overrides
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod cache;
pub mod compare;
pub mod config;
pub mod constants;
pub mod judge;
pub mod recorder;
pub mod similarity;
pub mod text;

pub use analysis::{
    AnalysisDistribution, AnalysisInput, ArticleAnalyzer, ComparedPair, DiffAnalysis, DiffMetrics,
    ItemProfile, MetricValue, SourceTag, Stats, overall_similarity, to_percentage,
};
pub use cache::{
    CACHE_KEY_PREFIX, CacheBackend, CacheBackendError, CacheBucket, CompareCache, MemoryBackend,
    build_cache_key,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::FailingBackend;

pub use compare::{
    CompareError, CompareFailure, CompareMetadata, CompareRequest, CompareResponse, CompareService,
    CreatorRef, EngineWeights, ScalarValue, ScoreDistribution, SingleFlight,
};
pub use config::{Config, ConfigError};
pub use constants::{WeightGroupError, clamp_unit, validate_weight_groups};
pub use judge::{
    GenaiJudge, InstinctiveScorer, JudgeContext, JudgeError, JudgeScore, JudgementProvider,
    build_prompt, extract_score,
};
#[cfg(any(test, feature = "mock"))]
pub use judge::MockJudgementProvider;

pub use recorder::{AssetRecorder, KnowledgeAsset, RecorderError, build_knowledge_asset};
#[cfg(any(test, feature = "mock"))]
pub use recorder::MockRecorder;

pub use similarity::{
    HeuristicSignals, LexicalEngine, LexicalError, LexicalReport, TokenLexicalEngine,
    sentence_similarity, word_similarity,
};
pub use text::{TextDocument, sanitize, split_sentences, tokenize};
