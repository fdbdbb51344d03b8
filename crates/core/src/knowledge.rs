use crate::chunking::{build_chunks, ChunkingConfig};
use crate::error::{IngestError, SearchError, StoreError};
use crate::extractor::extract_text;
use crate::index::TermIndex;
use crate::ingest::digest_bytes;
use crate::models::{
    Document, DocumentStatus, DocumentSummary, IngestionOptions, ListOptions, MediaType,
    MetadataPatch, SearchOptions, SearchResult, Upload,
};
use crate::search::run_search;
use crate::store::DocumentStore;
use crate::traits::BlobStore;
use chrono::Utc;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct KbState {
    documents: DocumentStore,
    index: TermIndex,
}

/// Process-wide knowledge-base state: the document store and the term index
/// behind a single writer lock, so a document's record and its index entries
/// become visible to readers together or not at all.
///
/// Extraction runs before the lock is taken, so a slow upload never blocks
/// searches over already-indexed documents.
pub struct KnowledgeBase<B: BlobStore> {
    blobs: B,
    options: IngestionOptions,
    state: RwLock<KbState>,
}

impl<B> KnowledgeBase<B>
where
    B: BlobStore + Send + Sync,
{
    pub fn new(blobs: B) -> Self {
        Self::with_options(blobs, IngestionOptions::default())
    }

    pub fn with_options(blobs: B, options: IngestionOptions) -> Self {
        Self {
            blobs,
            options,
            state: RwLock::new(KbState::default()),
        }
    }

    pub fn blob_store(&self) -> &B {
        &self.blobs
    }

    pub fn document_count(&self) -> usize {
        self.state.read().unwrap().documents.len()
    }

    /// Ingests an upload end to end: extract, chunk, then index and store.
    ///
    /// All-or-nothing: any failure after the upload bytes are stored releases
    /// the blob again, and the store and index are only touched on success.
    pub async fn ingest(&self, upload: Upload) -> Result<Document, IngestError> {
        let Upload {
            bytes,
            media_type: declared_type,
            file_name,
            file_size_bytes,
            owner_id,
            title,
            description,
            category,
        } = upload;

        let media_type = MediaType::parse(&declared_type)?;
        let chunking = ChunkingConfig::from(&self.options);
        let checksum = digest_bytes(&bytes);

        let file_path = self.blobs.put(&file_name, &bytes).await?;

        let outcome = async {
            let extracted_text = self.extract_with_timeout(bytes, media_type).await?;
            let chunks = build_chunks(&extracted_text, chunking)?;
            let word_count = extracted_text.split_whitespace().count();
            let now = Utc::now();

            let document = Document {
                id: Uuid::new_v4().to_string(),
                owner_id,
                title: title.unwrap_or_else(|| file_name.clone()),
                description,
                category,
                file_name,
                file_size_bytes,
                media_type,
                file_path: file_path.clone(),
                checksum,
                extracted_text,
                chunks,
                word_count,
                status: DocumentStatus::Processed,
                created_at: now,
                updated_at: now,
            };

            let mut state = self.state.write().unwrap();
            state.index.insert_document(&document);
            state.documents.insert(document.clone());
            Ok::<_, IngestError>(document)
        }
        .await;

        match outcome {
            Ok(document) => Ok(document),
            Err(error) => {
                let _ = self.blobs.remove(&file_path).await;
                Err(error)
            }
        }
    }

    pub fn search(
        &self,
        query: &str,
        owner_id: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let state = self.state.read().unwrap();
        run_search(&state.documents, &state.index, query, owner_id, options)
    }

    pub fn list_documents(&self, owner_id: &str, options: &ListOptions) -> Vec<DocumentSummary> {
        self.state.read().unwrap().documents.list(owner_id, options)
    }

    pub fn get_document(&self, owner_id: &str, document_id: &str) -> Result<Document, StoreError> {
        self.state
            .read()
            .unwrap()
            .documents
            .get(owner_id, document_id)
            .map(Clone::clone)
    }

    pub fn update_document_metadata(
        &self,
        owner_id: &str,
        document_id: &str,
        patch: MetadataPatch,
    ) -> Result<Document, StoreError> {
        self.state
            .write()
            .unwrap()
            .documents
            .update_metadata(owner_id, document_id, patch)
    }

    /// Removes the document record and every index reference under one write
    /// lock, then releases the backing blob.
    pub async fn delete_document(
        &self,
        owner_id: &str,
        document_id: &str,
    ) -> Result<(), StoreError> {
        let removed = {
            let mut state = self.state.write().unwrap();
            let document = state.documents.remove(owner_id, document_id)?;
            state.index.remove_document(&document.id);
            document
        };

        // The record and index entries are already gone; blob release is
        // best-effort.
        let _ = self.blobs.remove(&removed.file_path).await;
        Ok(())
    }

    async fn extract_with_timeout(
        &self,
        bytes: Vec<u8>,
        media_type: MediaType,
    ) -> Result<String, IngestError> {
        let parse = tokio::task::spawn_blocking(move || extract_text(&bytes, media_type));

        match tokio::time::timeout(self.options.extraction_timeout, parse).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(IngestError::ExtractionFailed(join_error.to_string())),
            Err(_) => Err(IngestError::ExtractionFailed(format!(
                "extraction exceeded {}s",
                self.options.extraction_timeout.as_secs()
            ))),
        }
    }
}
