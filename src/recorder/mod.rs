//! Persistence collaborator seam.
//!
//! The core builds a structured, schema.org-flavored asset document from a
//! finished analysis; actually publishing it (and whatever retry policy that
//! involves) belongs to the collaborator behind [`AssetRecorder`]. With no
//! recorder configured, responses carry `recorded: false, ual: null`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::DiffAnalysis;
use crate::compare::CompareMetadata;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("asset publish failed: {reason}")]
    PublishFailed { reason: String },
}

/// One compared item inside the asset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetComparedItem {
    pub label: String,
    pub preview: String,
    pub fingerprint: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub source: String,
}

/// Structured knowledge-asset document handed to the recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeAsset {
    #[serde(rename = "@type")]
    pub asset_type: Vec<String>,
    pub name: String,
    pub description: String,
    pub date_created: String,
    pub version: String,
    pub license: String,
    pub metrics: crate::analysis::AnalysisDistribution,
    pub shared_vocabulary_ratio: f64,
    pub compared_items: Vec<AssetComparedItem>,
}

/// Assembles the asset document from a finished analysis plus any request
/// metadata (per-side source references and a license override).
pub fn build_knowledge_asset(
    analysis: &DiffAnalysis,
    metadata: Option<&CompareMetadata>,
    title: Option<&str>,
) -> KnowledgeAsset {
    let a = &analysis.compared.a;
    let b = &analysis.compared.b;

    let compared_items = vec![
        AssetComparedItem {
            label: a.label.clone(),
            preview: a.preview.clone(),
            fingerprint: a.fingerprint.clone(),
            word_count: a.word_count,
            sentence_count: a.sentence_count,
            character_count: a.character_count,
            source: metadata
                .and_then(|m| m.source_a.clone())
                .unwrap_or_else(|| "a-side".to_string()),
        },
        AssetComparedItem {
            label: b.label.clone(),
            preview: b.preview.clone(),
            fingerprint: b.fingerprint.clone(),
            word_count: b.word_count,
            sentence_count: b.sentence_count,
            character_count: b.character_count,
            source: metadata
                .and_then(|m| m.source_b.clone())
                .unwrap_or_else(|| "b-side".to_string()),
        },
    ];

    let name = match title {
        Some(title) => format!("{title} – Article Similarity Profile"),
        None => format!("{} vs {} Similarity Profile", a.label, b.label),
    };

    KnowledgeAsset {
        asset_type: vec!["Dataset".to_string(), "DifferenceProfile".to_string()],
        name,
        description: format!("Comparison between two articles. {}", analysis.summary),
        date_created: analysis.created_at.clone(),
        version: "1.0.0".to_string(),
        license: metadata
            .and_then(|m| m.license.clone())
            .unwrap_or_else(|| "https://creativecommons.org/licenses/by/4.0/".to_string()),
        metrics: analysis.distribution(),
        shared_vocabulary_ratio: analysis.stats.shared_word_ratio,
        compared_items,
    }
}

/// Persistence collaborator: accepts the analysis plus the asset document,
/// returns an opaque record identifier (or `None` when the backend accepted
/// the asset without minting one).
#[async_trait]
pub trait AssetRecorder: Send + Sync {
    async fn record(
        &self,
        analysis: &DiffAnalysis,
        asset: &KnowledgeAsset,
    ) -> Result<Option<String>, RecorderError>;
}

/// In-memory recorder for tests: remembers every asset and mints sequential
/// identifiers.
#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
pub struct MockRecorder {
    recorded: parking_lot::Mutex<Vec<KnowledgeAsset>>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "mock"))]
impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `record` call fail.
    pub fn fail_next(&self) {
        self.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn recorded_count(&self) -> usize {
        self.recorded.lock().len()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl AssetRecorder for MockRecorder {
    async fn record(
        &self,
        _analysis: &DiffAnalysis,
        asset: &KnowledgeAsset,
    ) -> Result<Option<String>, RecorderError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(RecorderError::PublishFailed {
                reason: "mock recorder failure".to_string(),
            });
        }

        let mut recorded = self.recorded.lock();
        recorded.push(asset.clone());
        Ok(Some(format!("did:asset:{}", recorded.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisInput, ArticleAnalyzer};
    use crate::judge::{InstinctiveScorer, MockJudgementProvider};

    async fn sample_analysis() -> DiffAnalysis {
        let analyzer: ArticleAnalyzer<MockJudgementProvider> =
            ArticleAnalyzer::new(InstinctiveScorer::new(None));
        analyzer
            .analyze(AnalysisInput {
                text_a: "First article body.",
                text_b: "Second article body.",
                title: Some("Sample"),
            })
            .await
    }

    #[tokio::test]
    async fn test_asset_carries_metrics_and_fingerprints() {
        let analysis = sample_analysis().await;
        let asset = build_knowledge_asset(&analysis, None, Some("Sample"));

        assert_eq!(asset.name, "Sample – Article Similarity Profile");
        assert_eq!(asset.compared_items.len(), 2);
        assert_eq!(
            asset.compared_items[0].fingerprint,
            analysis.compared.a.fingerprint
        );
        assert_eq!(
            asset.metrics.overall_similarity,
            analysis.metrics.overall_similarity.value
        );
        assert!(asset.description.contains(&analysis.summary));
    }

    #[tokio::test]
    async fn test_asset_uses_metadata_sources_and_license() {
        let analysis = sample_analysis().await;
        let metadata = CompareMetadata {
            source_a: Some("https://example.org/a".to_string()),
            license: Some("CC0-1.0".to_string()),
            ..Default::default()
        };
        let asset = build_knowledge_asset(&analysis, Some(&metadata), None);

        assert_eq!(asset.compared_items[0].source, "https://example.org/a");
        assert_eq!(asset.compared_items[1].source, "b-side");
        assert_eq!(asset.license, "CC0-1.0");
    }

    #[tokio::test]
    async fn test_mock_recorder_mints_identifiers() {
        let analysis = sample_analysis().await;
        let asset = build_knowledge_asset(&analysis, None, None);
        let recorder = MockRecorder::new();

        let ual = recorder.record(&analysis, &asset).await.unwrap();
        assert_eq!(ual.as_deref(), Some("did:asset:1"));
        assert_eq!(recorder.recorded_count(), 1);
    }
}
