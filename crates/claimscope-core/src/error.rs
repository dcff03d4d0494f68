//! Error types for claimscope.

use thiserror::Error;

/// Result type alias using claimscope's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for claimscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uploaded document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Assessment record not found
    #[error("Assessment not found: {0}")]
    AssessmentNotFound(uuid::Uuid),

    /// AI analysis failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Prior-art search failed
    #[error("Patent search error: {0}")]
    PatentSearch(String),

    /// Assessment pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Operation exceeded its time budget
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
