//! Document analysis builder
//!
//! Collects feature types, one input source and the metadata flag, then runs
//! a single `AnalyzeDocument` call and reshapes its output.

use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{AwsTextractClient, TextractApi};
use crate::config::TextractConfig;
use crate::error::{Result, TextractError};
use crate::types::{
    AnalysisResponse, AnalyzeDocumentRequest, Document, FeatureSet, InputSource, S3Object,
};

/// Fluent builder for one Textract document analysis
///
/// ```rust,ignore
/// let response = AnalyseDocument::from_config(&config)
///     .await
///     .with_features(["TABLES", "FORMS"])
///     .file("invoice.png")?
///     .with_metadata()
///     .analyze()
///     .await?;
/// ```
pub struct AnalyseDocument {
    client: Arc<dyn TextractApi>,
    features: FeatureSet,
    source: Option<InputSource>,
    want_metadata: bool,
}

impl AnalyseDocument {
    pub fn new(client: Arc<dyn TextractApi>) -> Self {
        Self {
            client,
            features: FeatureSet::new(),
            source: None,
            want_metadata: false,
        }
    }

    /// Create a builder backed by the AWS SDK client
    pub async fn from_config(config: &TextractConfig) -> Self {
        Self::new(Arc::new(AwsTextractClient::new(config).await))
    }

    /// Replace the requested feature types
    pub fn with_features(mut self, features: impl Into<FeatureSet>) -> Self {
        self.features = features.into();
        self
    }

    /// Analyse a local file, read when `analyze()` runs.
    ///
    /// Fails if an S3 object was already set. Calling it again replaces the path.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        if matches!(self.source, Some(InputSource::S3Object(_))) {
            return Err(TextractError::ConflictingSource);
        }

        self.source = Some(InputSource::LocalFile(path.into()));
        Ok(self)
    }

    /// Analyse an object stored in S3.
    ///
    /// Fails if a local file was already set. Calling it again replaces the object.
    pub fn s3(mut self, bucket: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        if matches!(self.source, Some(InputSource::LocalFile(_))) {
            return Err(TextractError::ConflictingSource);
        }

        self.source = Some(InputSource::S3Object(S3Object::new(bucket, name)));
        Ok(self)
    }

    /// Include `DocumentMetadata` and `@metadata` in the response
    pub fn with_metadata(mut self) -> Self {
        self.want_metadata = true;
        self
    }

    pub fn feature_types(&self) -> &FeatureSet {
        &self.features
    }

    pub fn source(&self) -> Option<&InputSource> {
        self.source.as_ref()
    }

    pub fn wants_metadata(&self) -> bool {
        self.want_metadata
    }

    /// Run the analysis.
    ///
    /// Each call reads the source again and issues a new request.
    pub async fn analyze(&self) -> Result<AnalysisResponse> {
        let document = self.resolve_document().await?;

        tracing::debug!(
            features = ?self.features.as_slice(),
            metadata = self.want_metadata,
            "Calling Textract AnalyzeDocument"
        );

        let output = self
            .client
            .analyze_document(AnalyzeDocumentRequest {
                feature_types: self.features.clone(),
                document,
            })
            .await?;

        tracing::info!("Textract returned {} blocks", output.blocks.len());

        Ok(AnalysisResponse::from_output(output, self.want_metadata))
    }

    async fn resolve_document(&self) -> Result<Document> {
        match &self.source {
            Some(InputSource::LocalFile(path)) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| TextractError::ResourceRead {
                        path: path.clone(),
                        source,
                    })?;
                tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Document::Bytes(bytes))
            }
            Some(InputSource::S3Object(object)) => Ok(Document::S3Object(object.clone())),
            None => Err(TextractError::MissingSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::types::AnalyzeDocumentOutput;

    /// Stub client returning a fixed output and recording requests
    struct StubClient {
        output: AnalyzeDocumentOutput,
        requests: Mutex<Vec<AnalyzeDocumentRequest>>,
    }

    impl StubClient {
        fn new(output: AnalyzeDocumentOutput) -> Arc<Self> {
            Arc::new(Self {
                output,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn empty() -> Arc<Self> {
            Self::new(AnalyzeDocumentOutput {
                blocks: Vec::new(),
                document_metadata: json!([]),
                api_metadata: json!([]),
            })
        }

        fn requests(&self) -> Vec<AnalyzeDocumentRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextractApi for StubClient {
        async fn analyze_document(&self, request: AnalyzeDocumentRequest) -> Result<AnalyzeDocumentOutput> {
            self.requests.lock().unwrap().push(request);
            Ok(self.output.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl TextractApi for FailingClient {
        async fn analyze_document(&self, _request: AnalyzeDocumentRequest) -> Result<AnalyzeDocumentOutput> {
            Err(TextractError::client(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "UnrecognizedClientException",
            )))
        }
    }

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_can_set_features() {
        let analyse = AnalyseDocument::new(StubClient::empty()).with_features(["TABLES", "FORMS"]);

        assert_eq!(analyse.feature_types().as_slice(), ["TABLES", "FORMS"]);
    }

    #[test]
    fn test_features_are_replaced() {
        let analyse = AnalyseDocument::new(StubClient::empty())
            .with_features(["TABLES", "FORMS"])
            .with_features("LAYOUT");

        assert_eq!(analyse.feature_types().as_slice(), ["LAYOUT"]);
    }

    #[test]
    fn test_can_set_file() {
        let analyse = AnalyseDocument::new(StubClient::empty())
            .file("path/to/file")
            .unwrap();

        assert_eq!(
            analyse.source(),
            Some(&InputSource::LocalFile(PathBuf::from("path/to/file")))
        );
    }

    #[test]
    fn test_can_set_s3_object() {
        let analyse = AnalyseDocument::new(StubClient::empty())
            .s3("bucket", "file")
            .unwrap();

        assert_eq!(
            analyse.source(),
            Some(&InputSource::S3Object(S3Object::new("bucket", "file")))
        );
    }

    #[test]
    fn test_file_after_s3_conflicts() {
        let result = AnalyseDocument::new(StubClient::empty())
            .s3("bucket", "file")
            .unwrap()
            .file("path/to/file");

        assert!(matches!(result, Err(TextractError::ConflictingSource)));
    }

    #[test]
    fn test_s3_after_file_conflicts() {
        let result = AnalyseDocument::new(StubClient::empty())
            .file("path/to/file")
            .unwrap()
            .s3("bucket", "file");

        assert!(matches!(result, Err(TextractError::ConflictingSource)));
    }

    #[test]
    fn test_same_kind_source_overwrites() {
        let analyse = AnalyseDocument::new(StubClient::empty())
            .file("first")
            .and_then(|a| a.file("second"))
            .unwrap();
        assert_eq!(
            analyse.source(),
            Some(&InputSource::LocalFile(PathBuf::from("second")))
        );

        let analyse = AnalyseDocument::new(StubClient::empty())
            .s3("a", "1")
            .and_then(|a| a.s3("b", "2"))
            .unwrap();
        assert_eq!(
            analyse.source(),
            Some(&InputSource::S3Object(S3Object::new("b", "2")))
        );
    }

    #[test]
    fn test_can_enable_metadata() {
        let analyse = AnalyseDocument::new(StubClient::empty());
        assert!(!analyse.wants_metadata());

        let analyse = analyse.with_metadata().with_metadata();
        assert!(analyse.wants_metadata());
    }

    #[tokio::test]
    async fn test_missing_source() {
        let client = StubClient::empty();
        let result = AnalyseDocument::new(client.clone())
            .with_features(["TABLES", "FORMS"])
            .analyze()
            .await;

        assert!(matches!(result, Err(TextractError::MissingSource)));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_analyzes_file_without_metadata() {
        let file = temp_file(b"fake file content");
        let client = StubClient::empty();

        let response = tables_request(&client, file.path())
            .analyze()
            .await
            .unwrap();

        assert!(response.blocks.is_empty());
        assert!(response.metadata.is_none());

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].feature_types.as_slice(), ["TABLES"]);
        assert_eq!(requests[0].document, Document::Bytes(b"fake file content".to_vec()));
    }

    #[tokio::test]
    async fn test_analyzes_with_metadata() {
        let file = temp_file(b"fake file content");
        let client = StubClient::empty();

        let response = tables_request(&client, file.path())
            .with_metadata()
            .analyze()
            .await
            .unwrap();

        let metadata = response.metadata.expect("metadata requested");
        assert_eq!(metadata.document_metadata, json!([]));
        assert_eq!(metadata.api_metadata, json!([]));
    }

    #[tokio::test]
    async fn test_blocks_pass_through_in_order() {
        let blocks = vec![
            json!({"BlockType": "PAGE", "Id": "1"}),
            json!({"BlockType": "LINE", "Id": "2", "Text": "Hello"}),
        ];
        let client = StubClient::new(AnalyzeDocumentOutput {
            blocks: blocks.clone(),
            document_metadata: json!({"Pages": 1}),
            api_metadata: json!({"requestId": "abc"}),
        });

        let response = AnalyseDocument::new(client)
            .with_features("FORMS")
            .s3("bucket", "file")
            .unwrap()
            .analyze()
            .await
            .unwrap();

        assert_eq!(response.blocks, blocks);
        assert!(response.metadata.is_none());
    }

    #[tokio::test]
    async fn test_s3_source_sends_object_reference() {
        let client = StubClient::empty();

        AnalyseDocument::new(client.clone())
            .with_features(["TABLES"])
            .s3("bucket", "does/not/exist/locally.pdf")
            .unwrap()
            .analyze()
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(
            requests[0].document,
            Document::S3Object(S3Object::new("bucket", "does/not/exist/locally.pdf"))
        );
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let client = StubClient::empty();

        let result = AnalyseDocument::new(client.clone())
            .file(&missing)
            .unwrap()
            .analyze()
            .await;

        match result {
            Err(TextractError::ResourceRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected read error, got {other:?}"),
        }
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_remote_error_propagates() {
        let result = AnalyseDocument::new(Arc::new(FailingClient))
            .s3("bucket", "file")
            .unwrap()
            .analyze()
            .await;

        match result {
            Err(TextractError::Client(inner)) => {
                assert_eq!(inner.to_string(), "UnrecognizedClientException");
            }
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_analyze_reexecutes() {
        let client = StubClient::empty();
        let analyse = AnalyseDocument::new(client.clone())
            .s3("bucket", "file")
            .unwrap();

        analyse.analyze().await.unwrap();
        analyse.analyze().await.unwrap();

        assert_eq!(client.requests().len(), 2);
    }

    fn tables_request(client: &Arc<StubClient>, path: &std::path::Path) -> AnalyseDocument {
        AnalyseDocument::new(client.clone())
            .with_features(["TABLES"])
            .file(path)
            .unwrap()
    }
}
