use crate::error::IngestError;
use async_trait::async_trait;

/// Opaque storage for original upload bytes.
///
/// The engine only ever acquires a handle at ingestion and releases it when a
/// document is deleted or its ingestion fails.
#[async_trait]
pub trait BlobStore {
    /// Stores the upload and returns the handle to release it later.
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<String, IngestError>;

    async fn remove(&self, handle: &str) -> Result<(), IngestError>;
}
