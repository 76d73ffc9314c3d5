//! Comparison orchestration.
//!
//! Flow per request: validate → aggregate-bucket lookup → single-flight
//! guarded compute (both engine branches concurrently, no ordering between
//! them) → outer 0.80/0.20 blend → aggregate write-back → optional asset
//! recording. Validation failures and compute failures are the only errors
//! that propagate; they carry no partial payload.

mod engines;
pub mod error;
pub mod singleflight;
pub mod types;

pub use error::CompareError;
pub use singleflight::SingleFlight;
pub use types::{
    CompareFailure, CompareMetadata, CompareRequest, CompareResponse, CreatorRef, EngineWeights,
    ScalarValue, ScoreDistribution,
};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::analysis::{AnalysisInput, ArticleAnalyzer};
use crate::cache::{CacheBackend, CacheBucket, CompareCache, build_cache_key};
use crate::constants::{
    ANALYSIS_ENGINE_WEIGHT, DEFAULT_MAX_INPUT_CHARS, LEXICAL_ENGINE_WEIGHT, clamp_unit,
};
use crate::judge::JudgementProvider;
use crate::recorder::{AssetRecorder, build_knowledge_asset};
use crate::similarity::LexicalEngine;

/// The comparison orchestrator. Engine instances are injected once at
/// construction; the service itself holds no mutable state beyond the
/// single-flight table.
pub struct CompareService<L, P, B>
where
    L: LexicalEngine,
    P: JudgementProvider,
    B: CacheBackend,
{
    lexical: L,
    analyzer: ArticleAnalyzer<P>,
    cache: CompareCache<B>,
    recorder: Option<Arc<dyn AssetRecorder>>,
    flights: SingleFlight<Result<CompareResponse, CompareError>>,
    max_input_chars: usize,
}

impl<L, P, B> std::fmt::Debug for CompareService<L, P, B>
where
    L: LexicalEngine,
    P: JudgementProvider,
    B: CacheBackend,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareService")
            .field("cache", &self.cache.is_configured())
            .field("recorder", &self.recorder.is_some())
            .field("flights", &self.flights)
            .finish_non_exhaustive()
    }
}

impl<L, P, B> CompareService<L, P, B>
where
    L: LexicalEngine,
    P: JudgementProvider,
    B: CacheBackend,
{
    pub fn new(lexical: L, analyzer: ArticleAnalyzer<P>, cache: CompareCache<B>) -> Self {
        Self {
            lexical,
            analyzer,
            cache,
            recorder: None,
            flights: SingleFlight::new(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn AssetRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Runs one comparison end to end.
    #[instrument(skip(self, request), fields(
        text_a_len = request.text_a.len(),
        text_b_len = request.text_b.len(),
        record = request.record_asset,
    ))]
    pub async fn compare(&self, request: CompareRequest) -> Result<CompareResponse, CompareError> {
        self.validate(&request)?;

        let aggregate_key =
            build_cache_key(CacheBucket::Aggregate, &request.text_a, &request.text_b);

        if let Some(cached) = self.cache.get::<CompareResponse>(&aggregate_key).await {
            info!("Aggregate cache hit");
            return self.finish(cached, &request).await;
        }

        debug!("Aggregate cache miss");
        let request_ref = &request;
        let key_ref: &str = &aggregate_key;
        let shared = self
            .flights
            .run(&aggregate_key, move || async move {
                let response = self.compute(request_ref).await?;
                self.cache.set(key_ref, &response).await;
                Ok(response)
            })
            .await?;

        self.finish(shared, &request).await
    }

    fn validate(&self, request: &CompareRequest) -> Result<(), CompareError> {
        if request.text_a.is_empty() || request.text_b.is_empty() {
            return Err(CompareError::Validation {
                reason: "both textA and textB are required".to_string(),
            });
        }

        for (field, text) in [("textA", &request.text_a), ("textB", &request.text_b)] {
            if text.chars().count() > self.max_input_chars {
                return Err(CompareError::Validation {
                    reason: format!("{field} exceeds {} characters", self.max_input_chars),
                });
            }
        }

        if let Some(metadata) = &request.metadata {
            metadata
                .validate()
                .map_err(|reason| CompareError::Validation { reason })?;
        }

        Ok(())
    }

    /// Both engine branches, joined; no ordering dependency between them.
    async fn compute(&self, request: &CompareRequest) -> Result<CompareResponse, CompareError> {
        let input = AnalysisInput {
            text_a: &request.text_a,
            text_b: &request.text_b,
            title: request.title.as_deref(),
        };

        let (lexical, analysis) = tokio::join!(
            engines::lexical_branch(&self.lexical, &self.cache, &request.text_a, &request.text_b),
            engines::analysis_branch(&self.analyzer, &self.cache, input),
        );

        let (Some(lexical), Some(analysis)) = (lexical, analysis) else {
            return Err(CompareError::Compute {
                reason: "failed to compute comparison results".to_string(),
            });
        };

        let distribution = analysis.distribution();
        let score = clamp_unit(
            distribution.overall_similarity * ANALYSIS_ENGINE_WEIGHT
                + lexical.overall_similarity * LEXICAL_ENGINE_WEIGHT,
        );

        Ok(CompareResponse {
            score,
            score_distribution: ScoreDistribution {
                lexical,
                analysis: distribution,
            },
            weights: EngineWeights {
                lexical: LEXICAL_ENGINE_WEIGHT,
                analysis: ANALYSIS_ENGINE_WEIGHT,
            },
            analysis,
            recorded: false,
            ual: None,
        })
    }

    /// Applies per-request recording on top of the shared (cacheable)
    /// response. Recording state never enters the cache.
    async fn finish(
        &self,
        mut response: CompareResponse,
        request: &CompareRequest,
    ) -> Result<CompareResponse, CompareError> {
        if !request.record_asset {
            return Ok(response);
        }

        let Some(recorder) = &self.recorder else {
            warn!("Recording requested but no recorder is configured");
            return Ok(response);
        };

        let asset = build_knowledge_asset(
            &response.analysis,
            request.metadata.as_ref(),
            request.title.as_deref(),
        );
        let ual = recorder
            .record(&response.analysis, &asset)
            .await
            .map_err(|error| CompareError::Upstream {
                reason: error.to_string(),
            })?;

        info!(ual = ual.as_deref(), "Analysis recorded");
        response.recorded = ual.is_some();
        response.ual = ual;
        Ok(response)
    }
}
