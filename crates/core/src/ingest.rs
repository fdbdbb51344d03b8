use crate::error::IngestError;
use crate::knowledge::KnowledgeBase;
use crate::models::{Document, MediaType, Upload};
use crate::traits::BlobStore;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn discover_supported_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if media_type_for_path(entry.path()).is_some() {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn media_type_for_path(path: &Path) -> Option<MediaType> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(MediaType::from_extension)
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct IngestionReport {
    pub documents: Vec<Document>,
    pub skipped_files: Vec<SkippedFile>,
}

/// Ingests every supported file under the folder, best effort: files that
/// fail extraction are reported as skipped instead of aborting the run.
pub async fn ingest_folder<B>(
    kb: &KnowledgeBase<B>,
    folder: &Path,
    owner_id: &str,
) -> Result<IngestionReport, IngestError>
where
    B: BlobStore + Send + Sync,
{
    let files = discover_supported_files(folder);

    if files.is_empty() {
        return Err(IngestError::InvalidArgument(format!(
            "no supported files found in {}",
            folder.display()
        )));
    }

    let mut documents = Vec::new();
    let mut skipped_files = Vec::new();

    for path in files {
        match ingest_file(kb, &path, owner_id).await {
            Ok(document) => documents.push(document),
            Err(error) => skipped_files.push(SkippedFile {
                path,
                reason: error.to_string(),
            }),
        }
    }

    Ok(IngestionReport {
        documents,
        skipped_files,
    })
}

async fn ingest_file<B>(
    kb: &KnowledgeBase<B>,
    path: &Path,
    owner_id: &str,
) -> Result<Document, IngestError>
where
    B: BlobStore + Send + Sync,
{
    let media_type = media_type_for_path(path).ok_or_else(|| IngestError::UnsupportedMediaType {
        media_type: path.display().to_string(),
    })?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    let file_size_bytes = bytes.len() as u64;

    kb.ingest(Upload {
        bytes,
        media_type: media_type.as_mime().to_string(),
        file_name: file_name.to_string(),
        file_size_bytes,
        owner_id: owner_id.to_string(),
        title: None,
        description: None,
        category: None,
    })
    .await
}
