//! Request and response contracts for the comparison orchestrator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisDistribution, DiffAnalysis};
use crate::similarity::LexicalReport;

/// Bounds enforced by [`CompareMetadata::validate`].
pub const MAX_METADATA_TAGS: usize = 40;
pub const MAX_METADATA_DOMAIN_CHARS: usize = 120;
pub const MAX_METADATA_SOURCE_CHARS: usize = 280;
pub const MAX_METADATA_EXTERNAL_IDS: usize = 10;
pub const MAX_METADATA_CUSTOM_ENTRIES: usize = 32;

/// A scalar metadata value (no nested structures at the boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorRef {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Named, size-bounded request metadata. Validated before the core runs;
/// arbitrary nested objects are rejected by the schema itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareMetadata {
    pub tags: Vec<String>,
    pub domain: Option<String>,
    pub source_a: Option<String>,
    pub source_b: Option<String>,
    pub external_ids: Vec<String>,
    pub creator: Option<CreatorRef>,
    pub license: Option<String>,
    pub custom: BTreeMap<String, ScalarValue>,
}

impl CompareMetadata {
    /// Checks every size bound; the error is the human-readable reason.
    pub fn validate(&self) -> Result<(), String> {
        if self.tags.len() > MAX_METADATA_TAGS {
            return Err(format!("metadata.tags exceeds {MAX_METADATA_TAGS} entries"));
        }
        if let Some(domain) = &self.domain {
            if domain.chars().count() > MAX_METADATA_DOMAIN_CHARS {
                return Err(format!(
                    "metadata.domain exceeds {MAX_METADATA_DOMAIN_CHARS} characters"
                ));
            }
        }
        for (field, value) in [("sourceA", &self.source_a), ("sourceB", &self.source_b)] {
            if let Some(source) = value {
                if source.chars().count() > MAX_METADATA_SOURCE_CHARS {
                    return Err(format!(
                        "metadata.{field} exceeds {MAX_METADATA_SOURCE_CHARS} characters"
                    ));
                }
            }
        }
        if self.external_ids.len() > MAX_METADATA_EXTERNAL_IDS {
            return Err(format!(
                "metadata.externalIds exceeds {MAX_METADATA_EXTERNAL_IDS} entries"
            ));
        }
        if self.custom.len() > MAX_METADATA_CUSTOM_ENTRIES {
            return Err(format!(
                "metadata.custom exceeds {MAX_METADATA_CUSTOM_ENTRIES} entries"
            ));
        }
        Ok(())
    }
}

/// One comparison request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub text_a: String,
    pub text_b: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<CompareMetadata>,
    /// Hand the finished analysis to the persistence collaborator.
    #[serde(default)]
    pub record_asset: bool,
}

impl CompareRequest {
    pub fn new(text_a: impl Into<String>, text_b: impl Into<String>) -> Self {
        Self {
            text_a: text_a.into(),
            text_b: text_b.into(),
            title: None,
            metadata: None,
            record_asset: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_metadata(mut self, metadata: CompareMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_recording(mut self) -> Self {
        self.record_asset = true;
        self
    }
}

/// The fixed outer weight split published with every response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineWeights {
    pub lexical: f64,
    pub analysis: f64,
}

/// Both engine score distributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub lexical: LexicalReport,
    pub analysis: AnalysisDistribution,
}

/// Successful comparison response.
///
/// `recorded` and `ual` default on deserialization so aggregate payloads
/// cached before those fields existed still load cleanly (back-filled with
/// their null defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub score: f64,
    pub score_distribution: ScoreDistribution,
    pub weights: EngineWeights,
    pub analysis: DiffAnalysis,
    #[serde(default)]
    pub recorded: bool,
    #[serde(default)]
    pub ual: Option<String>,
}

/// Structured failure payload: `{status: false, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareFailure {
    pub status: bool,
    pub message: String,
}
