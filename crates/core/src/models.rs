use crate::error::IngestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "text/plain")]
    PlainText,
    #[serde(rename = "text/markdown")]
    Markdown,
}

impl MediaType {
    /// Parses a declared MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn parse(declared: &str) -> Result<Self, IngestError> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Ok(MediaType::Pdf),
            "text/plain" => Ok(MediaType::PlainText),
            "text/markdown" => Ok(MediaType::Markdown),
            _ => Err(IngestError::UnsupportedMediaType {
                media_type: declared.trim().to_string(),
            }),
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "txt" => Some(MediaType::PlainText),
            "md" | "markdown" => Some(MediaType::Markdown),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::PlainText => "text/plain",
            MediaType::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_mime())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Processed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextChunk {
    pub text: String,
    /// Word offset of the chunk start within the source text.
    pub start_index: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub media_type: MediaType,
    /// Opaque handle into the blob store holding the original upload.
    pub file_path: String,
    pub checksum: String,
    pub extracted_text: String,
    pub chunks: Vec<TextChunk>,
    pub word_count: usize,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing/search view of a document: everything except the large payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub media_type: MediaType,
    pub file_path: String,
    pub checksum: String,
    pub word_count: usize,
    pub chunk_count: usize,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            owner_id: document.owner_id.clone(),
            title: document.title.clone(),
            description: document.description.clone(),
            category: document.category.clone(),
            file_name: document.file_name.clone(),
            file_size_bytes: document.file_size_bytes,
            media_type: document.media_type,
            file_path: document.file_path.clone(),
            checksum: document.checksum.clone(),
            word_count: document.word_count,
            chunk_count: document.chunks.len(),
            status: document.status,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    FileName,
    FileSize,
    WordCount,
    Category,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(SortField::Title),
            "file_name" => Some(SortField::FileName),
            "file_size" => Some(SortField::FileSize),
            "word_count" => Some(SortField::WordCount),
            "category" => Some(SortField::Category),
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    /// 1-indexed page number.
    pub page: usize,
    pub limit: usize,
    pub category: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            category: None,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: usize,
    pub category: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    /// Total query-term occurrences inside the chunk.
    pub score: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub document: DocumentSummary,
    /// Count of distinct query terms present anywhere in the document.
    pub score: usize,
    pub relevant_chunks: Vec<ScoredChunk>,
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// MIME type as declared by the uploader; validated during ingestion.
    pub media_type: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub owner_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestionOptions {
    pub window_words: usize,
    pub overlap_words: usize,
    pub extraction_timeout: Duration,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            window_words: 1_000,
            overlap_words: 100,
            extraction_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_parse_ignores_parameters() {
        let parsed = MediaType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(parsed, MediaType::PlainText);
    }

    #[test]
    fn media_type_parse_rejects_unknown() {
        let rejected = MediaType::parse("application/zip");
        assert!(matches!(
            rejected,
            Err(IngestError::UnsupportedMediaType { media_type }) if media_type == "application/zip"
        ));
    }

    #[test]
    fn media_type_from_extension_is_case_insensitive() {
        assert_eq!(MediaType::from_extension("PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension("markdown"), Some(MediaType::Markdown));
        assert_eq!(MediaType::from_extension("docx"), None);
    }

    #[test]
    fn summary_serialization_omits_text_and_chunks() {
        let document = Document {
            id: "doc-1".to_string(),
            owner_id: "user-1".to_string(),
            title: "Manual".to_string(),
            description: None,
            category: Some("manuals".to_string()),
            file_name: "manual.txt".to_string(),
            file_size_bytes: 11,
            media_type: MediaType::PlainText,
            file_path: "blobs/manual.txt".to_string(),
            checksum: "checksum".to_string(),
            extracted_text: "hello world".to_string(),
            chunks: vec![TextChunk {
                text: "hello world".to_string(),
                start_index: 0,
                word_count: 2,
            }],
            word_count: 2,
            status: DocumentStatus::Processed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let summary = DocumentSummary::from(&document);
        let rendered = serde_json::to_string(&summary).unwrap();
        assert!(!rendered.contains("extracted_text"));
        assert!(!rendered.contains("hello world"));
        assert_eq!(summary.chunk_count, 1);
        assert_eq!(summary.word_count, 2);
    }
}
