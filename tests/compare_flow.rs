//! End-to-end orchestrator flow: caching, stampede protection, fallback, and
//! failure semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use concord::{
    ArticleAnalyzer, CompareCache, CompareError, CompareMetadata, CompareRequest, CompareService,
    HeuristicSignals, InstinctiveScorer, LexicalEngine, LexicalError, LexicalReport, MemoryBackend,
    MockJudgementProvider, MockRecorder, TextDocument, TokenLexicalEngine,
};

/// Wraps the real lexical engine with an invocation counter, optional delay,
/// and a failure switch.
#[derive(Default)]
struct CountingLexicalEngine {
    inner: TokenLexicalEngine,
    calls: AtomicUsize,
    delay_ms: u64,
    fail: AtomicBool,
}

impl CountingLexicalEngine {
    fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LexicalEngine for Arc<CountingLexicalEngine> {
    async fn compute(&self, text_a: &str, text_b: &str) -> Result<LexicalReport, LexicalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(LexicalError::ComputationFailed {
                reason: "forced failure".to_string(),
            });
        }
        self.inner.compute(text_a, text_b).await
    }
}

type TestService =
    CompareService<Arc<CountingLexicalEngine>, MockJudgementProvider, MemoryBackend>;

fn build_service(
    engine: Arc<CountingLexicalEngine>,
    judge: Option<MockJudgementProvider>,
) -> TestService {
    let analyzer = ArticleAnalyzer::new(InstinctiveScorer::new(judge));
    let cache = CompareCache::new(Some(MemoryBackend::new(256)), Duration::from_secs(600));
    CompareService::new(engine, analyzer, cache)
}

#[tokio::test]
async fn repeated_request_serves_from_cache_without_engine_calls() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let judge = MockJudgementProvider::with_response(r#"{"instinctiveSimilarity": 0.6}"#);
    let service = build_service(Arc::clone(&engine), Some(judge.clone()));

    let request = CompareRequest::new(
        "The printing press transformed the spread of knowledge in Europe.",
        "Movable type dramatically accelerated how ideas circulated across Europe.",
    );

    let first = service.compare(request.clone()).await.unwrap();
    assert_eq!(engine.calls(), 1);
    assert_eq!(judge.calls(), 1);

    let second = service.compare(request).await.unwrap();
    assert_eq!(engine.calls(), 1, "cache hit must not re-invoke the engine");
    assert_eq!(judge.calls(), 1, "cache hit must not re-invoke the judge");
    assert_eq!(second.score, first.score);
    assert_eq!(second.analysis.id, first.analysis.id);
}

#[tokio::test]
async fn non_json_judge_reply_degrades_to_heuristic_fallback() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let judge =
        MockJudgementProvider::with_response("These articles feel moderately similar to me.");
    let service = build_service(Arc::clone(&engine), Some(judge.clone()));

    let text_a = "Coral reefs host a quarter of all marine species.";
    let text_b = "Rainforests shelter more than half of terrestrial biodiversity.";
    let response = service
        .compare(CompareRequest::new(text_a, text_b))
        .await
        .unwrap();

    let expected = HeuristicSignals::compute(&TextDocument::new(text_a), &TextDocument::new(text_b))
        .fallback;
    let instinctive = response.score_distribution.analysis.instinctive_similarity;
    assert!(
        (instinctive - expected).abs() < 1e-12,
        "instinctive {instinctive} should equal heuristic fallback {expected}"
    );
    assert_eq!(judge.calls(), 1);
}

#[tokio::test]
async fn empty_input_rejected_before_any_engine_runs() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let judge = MockJudgementProvider::new();
    let service = build_service(Arc::clone(&engine), Some(judge.clone()));

    let err = service
        .compare(CompareRequest::new("has content", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, CompareError::Validation { .. }));
    assert_eq!(engine.calls(), 0);
    assert_eq!(judge.calls(), 0);

    let failure = err.to_failure();
    assert!(!failure.status);
    assert!(!failure.message.is_empty());
}

#[tokio::test]
async fn concurrent_identical_requests_compute_once() {
    let engine = Arc::new(CountingLexicalEngine::with_delay(50));
    let service = Arc::new(build_service(Arc::clone(&engine), None));

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .compare(CompareRequest::new(
                    "Stampede protection keeps the herd together.",
                    "A single flight is enough for identical requests.",
                ))
                .await
        }));
    }

    let mut scores = Vec::new();
    for handle in handles {
        scores.push(handle.await.unwrap().unwrap().score);
    }

    assert_eq!(
        engine.calls(),
        1,
        "concurrent identical requests must share one computation"
    );
    assert!(scores.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn engine_failure_yields_compute_error_and_no_poisoned_cache() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let service = build_service(Arc::clone(&engine), None);
    let request = CompareRequest::new("resilient text", "other resilient text");

    engine.fail.store(true, Ordering::SeqCst);
    let err = service.compare(request.clone()).await.unwrap_err();
    assert!(matches!(err, CompareError::Compute { .. }));

    engine.fail.store(false, Ordering::SeqCst);
    let response = service.compare(request).await.unwrap();
    assert!((0.0..=1.0).contains(&response.score));
}

#[tokio::test]
async fn recording_is_per_request_and_never_cached() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let recorder = Arc::new(MockRecorder::new());
    let service = build_service(Arc::clone(&engine), None)
        .with_recorder(Arc::clone(&recorder) as Arc<dyn concord::AssetRecorder>);

    let request = CompareRequest::new("record this text", "against this other text");

    let recorded = service
        .compare(request.clone().with_recording())
        .await
        .unwrap();
    assert!(recorded.recorded);
    assert_eq!(recorded.ual.as_deref(), Some("did:asset:1"));
    assert_eq!(recorder.recorded_count(), 1);

    // Same fingerprint without the flag: cache hit, no recording state.
    let plain = service.compare(request).await.unwrap();
    assert!(!plain.recorded);
    assert_eq!(plain.ual, None);
    assert_eq!(recorder.recorded_count(), 1);
}

#[tokio::test]
async fn recorder_failure_propagates_only_when_recording_was_requested() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let recorder = Arc::new(MockRecorder::new());
    recorder.fail_next();
    let service = build_service(Arc::clone(&engine), None)
        .with_recorder(Arc::clone(&recorder) as Arc<dyn concord::AssetRecorder>);

    let request = CompareRequest::new("upstream text", "collaborator text");

    let err = service
        .compare(request.clone().with_recording())
        .await
        .unwrap_err();
    assert!(matches!(err, CompareError::Upstream { .. }));

    // Without the flag the same comparison succeeds untouched.
    let response = service.compare(request).await.unwrap();
    assert!(!response.recorded);
}

#[tokio::test]
async fn failing_cache_backend_never_breaks_the_flow() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let analyzer = ArticleAnalyzer::new(InstinctiveScorer::<MockJudgementProvider>::new(None));
    let cache = CompareCache::new(Some(concord::FailingBackend), Duration::from_secs(600));
    let service = CompareService::new(Arc::clone(&engine), analyzer, cache);

    let request = CompareRequest::new("cacheless text a", "cacheless text b");

    let first = service.compare(request.clone()).await.unwrap();
    let second = service.compare(request).await.unwrap();

    // Every request recomputes: the backend is down, reads degrade to misses.
    assert_eq!(engine.calls(), 2);
    assert_eq!(first.score, second.score);
}

#[tokio::test]
async fn oversized_metadata_is_a_validation_failure() {
    let engine = Arc::new(CountingLexicalEngine::default());
    let service = build_service(Arc::clone(&engine), None);

    let metadata = CompareMetadata {
        external_ids: (0..11).map(|i| format!("id-{i}")).collect(),
        ..Default::default()
    };
    let err = service
        .compare(CompareRequest::new("text a", "text b").with_metadata(metadata))
        .await
        .unwrap_err();

    assert!(matches!(err, CompareError::Validation { .. }));
    assert_eq!(engine.calls(), 0);
}
