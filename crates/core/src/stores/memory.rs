use crate::error::IngestError;
use crate::traits::BlobStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory blob store for tests and single-process demos.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.blobs.read().unwrap().contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().unwrap().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<String, IngestError> {
        let handle = format!("{}-{}", Uuid::new_v4(), file_name);
        self.blobs
            .write()
            .unwrap()
            .insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    async fn remove(&self, handle: &str) -> Result<(), IngestError> {
        self.blobs.write().unwrap().remove(handle);
        Ok(())
    }
}
