use crate::error::IngestError;
use crate::traits::BlobStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Blob store keeping uploads as files under a root directory.
///
/// Handles are relative paths of the form `<uuid>-<file_name>`, so two
/// uploads of the same file never collide.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<String, IngestError> {
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| IngestError::MissingFileName(file_name.to_string()))?;

        tokio::fs::create_dir_all(&self.root).await?;

        let handle = format!("{}-{}", Uuid::new_v4(), base_name);
        tokio::fs::write(self.root.join(&handle), bytes).await?;
        Ok(handle)
    }

    async fn remove(&self, handle: &str) -> Result<(), IngestError> {
        tokio::fs::remove_file(self.root.join(handle)).await?;
        Ok(())
    }
}
