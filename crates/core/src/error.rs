use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported media type: {media_type}")]
    UnsupportedMediaType { media_type: String },

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query is empty")]
    InvalidQuery,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {document_id}")]
    NotFound { document_id: String },
}

impl StoreError {
    pub fn not_found(document_id: impl Into<String>) -> Self {
        StoreError::NotFound {
            document_id: document_id.into(),
        }
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
