//! Error types for Textract document analysis

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error raised by the remote Textract client
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, TextractError>;

/// Document analysis error type
#[derive(Error, Debug)]
pub enum TextractError {
    /// `analyze()` was called before `file()` or `s3()`
    #[error("Method file() or s3() must be called before calling the analyze() method.")]
    MissingSource,

    /// A local file and an S3 object were both chained onto one request
    #[error("The file and s3 methods cannot be chained together in the same instance.")]
    ConflictingSource,

    /// The local input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by the remote client, passed through untouched
    #[error(transparent)]
    Client(BoxError),
}

impl TextractError {
    /// Wrap a remote client failure
    pub fn client(err: impl Into<BoxError>) -> Self {
        Self::Client(err.into())
    }
}
