pub mod chunking;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod knowledge;
pub mod models;
pub mod search;
pub mod store;
pub mod stores;
pub mod traits;

pub use chunking::{build_chunks, ChunkingConfig};
pub use error::{IngestError, SearchError, StoreError};
pub use extractor::{extract_text, DocumentExtractor, TextExtractor};
pub use index::{tokenize, DocumentRef, TermIndex};
pub use ingest::{
    digest_bytes, discover_supported_files, ingest_folder, media_type_for_path, IngestionReport,
    SkippedFile,
};
pub use knowledge::KnowledgeBase;
pub use models::{
    Document, DocumentStatus, DocumentSummary, IngestionOptions, ListOptions, MediaType,
    MetadataPatch, ScoredChunk, SearchOptions, SearchResult, SortField, SortOrder, TextChunk,
    Upload,
};
pub use search::{matched_terms, rank_documents, score_chunks, MAX_RELEVANT_CHUNKS};
pub use store::DocumentStore;
pub use stores::{FsBlobStore, MemoryBlobStore};
pub use traits::BlobStore;
