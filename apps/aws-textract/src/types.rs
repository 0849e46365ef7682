//! Analysis types
//!
//! Field names of the wire types match the Textract `AnalyzeDocument` API
//! (`FeatureTypes`, `Document`, `Blocks`, `DocumentMetadata`, `@metadata`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque block record (text line, table cell, form field, ...)
pub type Block = serde_json::Value;

/// Known feature names accepted by Textract
pub mod features {
    pub const TABLES: &str = "TABLES";
    pub const FORMS: &str = "FORMS";
    pub const QUERIES: &str = "QUERIES";
    pub const SIGNATURES: &str = "SIGNATURES";
    pub const LAYOUT: &str = "LAYOUT";
}

/// Ordered list of requested feature names
///
/// Names are not checked here; Textract validates them server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<&str> for FeatureSet {
    fn from(feature: &str) -> Self {
        Self(vec![feature.to_string()])
    }
}

impl From<String> for FeatureSet {
    fn from(feature: String) -> Self {
        Self(vec![feature])
    }
}

impl<S: Into<String>> From<Vec<S>> for FeatureSet {
    fn from(features: Vec<S>) -> Self {
        features.into_iter().collect()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for FeatureSet {
    fn from(features: [S; N]) -> Self {
        features.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Reference to an object in S3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Object {
    pub bucket: String,
    pub name: String,
}

impl S3Object {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Local file, read at analysis time
    LocalFile(PathBuf),
    /// Object already stored in S3, read by Textract itself
    S3Object(S3Object),
}

/// Document payload as sent to Textract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Bytes(Vec<u8>),
    S3Object(S3Object),
}

/// Input of the remote `AnalyzeDocument` operation
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeDocumentRequest {
    pub feature_types: FeatureSet,
    pub document: Document,
}

/// Raw output of the remote `AnalyzeDocument` operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeDocumentOutput {
    #[serde(rename = "Blocks", default)]
    pub blocks: Vec<Block>,
    #[serde(rename = "DocumentMetadata", default)]
    pub document_metadata: serde_json::Value,
    #[serde(rename = "@metadata", default)]
    pub api_metadata: serde_json::Value,
}

/// Metadata returned alongside the blocks when requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMetadata {
    #[serde(rename = "DocumentMetadata")]
    pub document_metadata: serde_json::Value,
    #[serde(rename = "@metadata")]
    pub api_metadata: serde_json::Value,
}

/// Reshaped analysis result
///
/// Serializes as `{"Blocks": [...]}`, or with `DocumentMetadata` and
/// `@metadata` alongside when metadata was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    #[serde(rename = "Blocks")]
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub metadata: Option<ResponseMetadata>,
}

impl AnalysisResponse {
    /// Keep the blocks and, if asked for, the two metadata records
    pub fn from_output(output: AnalyzeDocumentOutput, want_metadata: bool) -> Self {
        let metadata = want_metadata.then(|| ResponseMetadata {
            document_metadata: output.document_metadata,
            api_metadata: output.api_metadata,
        });

        Self {
            blocks: output.blocks,
            metadata,
        }
    }
}
