//! Textract client
//!
//! Defines the client trait used by [`AnalyseDocument`](crate::AnalyseDocument)
//! and its implementation on top of the AWS SDK.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_textract::{
    config::{Credentials, Region},
    operation::{analyze_document::AnalyzeDocumentOutput as SdkOutput, RequestId},
    primitives::Blob,
    types::{
        Block as SdkBlock, Document as SdkDocument, FeatureType, Geometry,
        S3Object as SdkS3Object,
    },
    Client,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{TextractConfig, DEFAULT_VERSION};
use crate::error::{Result, TextractError};
use crate::types::{AnalyzeDocumentOutput, AnalyzeDocumentRequest, Block, Document};

/// Remote document analysis operation
#[async_trait]
pub trait TextractApi: Send + Sync {
    /// Run `AnalyzeDocument` once, returning the raw output
    async fn analyze_document(&self, request: AnalyzeDocumentRequest) -> Result<AnalyzeDocumentOutput>;
}

/// AWS SDK backed Textract client
#[derive(Clone)]
pub struct AwsTextractClient {
    client: Client,
}

impl AwsTextractClient {
    /// Create a new Textract client from configuration
    pub async fn new(config: &TextractConfig) -> Self {
        if config.version != DEFAULT_VERSION {
            tracing::warn!(
                "Textract API version {} is not selectable with the Rust SDK, using latest",
                config.version
            );
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                &creds.key,
                &creds.secret,
                None,
                None,
                "aws-textract",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::debug!("Textract client configured for region {}", config.region);

        Self {
            client: Client::new(&sdk_config),
        }
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextractApi for AwsTextractClient {
    async fn analyze_document(&self, request: AnalyzeDocumentRequest) -> Result<AnalyzeDocumentOutput> {
        let feature_types: Vec<FeatureType> = request
            .feature_types
            .iter()
            .map(|f| FeatureType::from(f.as_str()))
            .collect();

        let response = self
            .client
            .analyze_document()
            .set_feature_types(Some(feature_types))
            .document(to_sdk_document(request.document))
            .send()
            .await
            .map_err(TextractError::client)?;

        Ok(output_from_sdk(&response))
    }
}

fn to_sdk_document(document: Document) -> SdkDocument {
    match document {
        Document::Bytes(bytes) => SdkDocument::builder().bytes(Blob::new(bytes)).build(),
        Document::S3Object(object) => SdkDocument::builder()
            .s3_object(
                SdkS3Object::builder()
                    .bucket(object.bucket)
                    .name(object.name)
                    .build(),
            )
            .build(),
    }
}

/// Convert the SDK output into the wire shape (`Blocks`, `DocumentMetadata`, `@metadata`)
fn output_from_sdk(output: &SdkOutput) -> AnalyzeDocumentOutput {
    let blocks = output.blocks().iter().map(block_to_json).collect();

    let mut document_metadata = Map::new();
    if let Some(meta) = output.document_metadata() {
        insert(&mut document_metadata, "Pages", meta.pages());
    }

    let mut api_metadata = Map::new();
    insert(&mut api_metadata, "requestId", output.request_id());
    insert(
        &mut api_metadata,
        "analyzeDocumentModelVersion",
        output.analyze_document_model_version(),
    );

    AnalyzeDocumentOutput {
        blocks,
        document_metadata: Value::Object(document_metadata),
        api_metadata: Value::Object(api_metadata),
    }
}

fn block_to_json(block: &SdkBlock) -> Block {
    let mut map = Map::new();

    insert(&mut map, "BlockType", block.block_type().map(|t| t.as_str()));
    insert(&mut map, "Confidence", block.confidence());
    insert(&mut map, "Text", block.text());
    insert(&mut map, "TextType", block.text_type().map(|t| t.as_str()));
    insert(&mut map, "RowIndex", block.row_index());
    insert(&mut map, "ColumnIndex", block.column_index());
    insert(&mut map, "RowSpan", block.row_span());
    insert(&mut map, "ColumnSpan", block.column_span());
    if let Some(geometry) = block.geometry() {
        map.insert("Geometry".to_string(), geometry_to_json(geometry));
    }
    insert(&mut map, "Id", block.id());

    if !block.relationships().is_empty() {
        let relationships: Vec<Value> = block
            .relationships()
            .iter()
            .map(|rel| {
                let mut entry = Map::new();
                insert(&mut entry, "Type", rel.r#type().map(|t| t.as_str()));
                insert(&mut entry, "Ids", rel.ids());
                Value::Object(entry)
            })
            .collect();
        map.insert("Relationships".to_string(), Value::Array(relationships));
    }

    if !block.entity_types().is_empty() {
        let entity_types: Vec<&str> = block.entity_types().iter().map(|t| t.as_str()).collect();
        insert(&mut map, "EntityTypes", entity_types);
    }

    insert(&mut map, "SelectionStatus", block.selection_status().map(|s| s.as_str()));
    insert(&mut map, "Page", block.page());

    Value::Object(map)
}

fn geometry_to_json(geometry: &Geometry) -> Value {
    let mut map = Map::new();

    if let Some(bb) = geometry.bounding_box() {
        let mut bounding_box = Map::new();
        insert(&mut bounding_box, "Width", bb.width());
        insert(&mut bounding_box, "Height", bb.height());
        insert(&mut bounding_box, "Left", bb.left());
        insert(&mut bounding_box, "Top", bb.top());
        map.insert("BoundingBox".to_string(), Value::Object(bounding_box));
    }

    if !geometry.polygon().is_empty() {
        let polygon: Vec<Value> = geometry
            .polygon()
            .iter()
            .map(|point| {
                let mut entry = Map::new();
                insert(&mut entry, "X", point.x());
                insert(&mut entry, "Y", point.y());
                Value::Object(entry)
            })
            .collect();
        map.insert("Polygon".to_string(), Value::Array(polygon));
    }

    Value::Object(map)
}

/// Insert a field, leaving absent values out of the record
fn insert<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: T) {
    match serde_json::to_value(value) {
        Ok(Value::Null) | Err(_) => {}
        Ok(v) => {
            map.insert(key.to_string(), v);
        }
    }
}
