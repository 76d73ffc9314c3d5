//! Per-engine computation branches, each with its own cache bucket.

use tracing::{debug, warn};

use crate::analysis::{AnalysisInput, ArticleAnalyzer, DiffAnalysis};
use crate::cache::{CacheBackend, CacheBucket, CompareCache, build_cache_key};
use crate::judge::JudgementProvider;
use crate::similarity::{LexicalEngine, LexicalReport};

/// Lexical branch: bucket lookup, compute on miss, best-effort write-back.
/// Returns `None` when the engine fails or produces non-finite metrics.
pub(crate) async fn lexical_branch<L: LexicalEngine, B: CacheBackend>(
    engine: &L,
    cache: &CompareCache<B>,
    text_a: &str,
    text_b: &str,
) -> Option<LexicalReport> {
    let key = build_cache_key(CacheBucket::Lexical, text_a, text_b);
    if let Some(report) = cache.get::<LexicalReport>(&key).await {
        return Some(report);
    }

    let report = match engine.compute(text_a, text_b).await {
        Ok(report) => report,
        Err(error) => {
            warn!(%error, "Lexical engine failed");
            return None;
        }
    };

    if !report.is_usable() {
        warn!("Lexical engine produced non-finite metrics");
        return None;
    }

    cache.set(&key, &report).await;
    Some(report)
}

/// Analysis branch: bucket lookup, full analysis on miss, best-effort
/// write-back. The analyzer itself is infallible (judgement failures degrade
/// inside the coordinator), so this only misses on a poisoned cached payload.
pub(crate) async fn analysis_branch<P: JudgementProvider, B: CacheBackend>(
    analyzer: &ArticleAnalyzer<P>,
    cache: &CompareCache<B>,
    input: AnalysisInput<'_>,
) -> Option<DiffAnalysis> {
    let key = build_cache_key(CacheBucket::Analysis, input.text_a, input.text_b);
    if let Some(analysis) = cache.get::<DiffAnalysis>(&key).await {
        return Some(analysis);
    }

    debug!("Analysis bucket miss, running analyzer");
    let analysis = analyzer.analyze(input).await;
    cache.set(&key, &analysis).await;
    Some(analysis)
}
