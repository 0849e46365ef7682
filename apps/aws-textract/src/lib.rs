//! AWS Textract document analysis
//!
//! A fluent builder around the Textract `AnalyzeDocument` operation.
//!
//! # Modules
//!
//! - `analyse`: the `AnalyseDocument` builder
//! - `client`: client trait and AWS SDK implementation
//! - `config`: region, version and credentials from the environment
//! - `types`: request/response data model

pub mod analyse;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use analyse::AnalyseDocument;
pub use client::{AwsTextractClient, TextractApi};
pub use config::{CredentialsConfig, TextractConfig};
pub use error::{Result, TextractError};
pub use types::{
    features, AnalysisResponse, AnalyzeDocumentOutput, AnalyzeDocumentRequest, Block, Document,
    FeatureSet, InputSource, ResponseMetadata, S3Object,
};
