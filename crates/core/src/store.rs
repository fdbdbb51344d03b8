use crate::error::StoreError;
use crate::models::{
    Document, DocumentStatus, DocumentSummary, ListOptions, MetadataPatch, SortField, SortOrder,
};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Owns all document records, keyed by document id and scoped per owner.
///
/// Every owner-scoped miss reports `NotFound`, so a document existing under a
/// different owner is indistinguishable from one that does not exist.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id.clone(), document);
    }

    pub fn get(&self, owner_id: &str, document_id: &str) -> Result<&Document, StoreError> {
        self.documents
            .get(document_id)
            .filter(|document| document.owner_id == owner_id)
            .ok_or_else(|| StoreError::not_found(document_id))
    }

    /// Unscoped lookup used by the search engine, which re-checks ownership.
    pub(crate) fn peek(&self, document_id: &str) -> Option<&Document> {
        self.documents.get(document_id)
    }

    pub fn list(&self, owner_id: &str, options: &ListOptions) -> Vec<DocumentSummary> {
        let mut matches: Vec<&Document> = self
            .documents
            .values()
            .filter(|document| document.owner_id == owner_id)
            .filter(|document| document.status == DocumentStatus::Processed)
            .filter(|document| match options.category.as_deref() {
                Some(category) => document.category.as_deref() == Some(category),
                None => true,
            })
            .collect();

        matches.sort_by(|left, right| {
            let ordering = compare_by_field(left, right, options.sort_by);
            match options.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page = options.page.max(1);
        matches
            .into_iter()
            .skip((page - 1) * options.limit)
            .take(options.limit)
            .map(DocumentSummary::from)
            .collect()
    }

    pub fn update_metadata(
        &mut self,
        owner_id: &str,
        document_id: &str,
        patch: MetadataPatch,
    ) -> Result<Document, StoreError> {
        let document = self
            .documents
            .get_mut(document_id)
            .filter(|document| document.owner_id == owner_id)
            .ok_or_else(|| StoreError::not_found(document_id))?;

        if let Some(title) = patch.title {
            document.title = title;
        }
        if let Some(description) = patch.description {
            document.description = Some(description);
        }
        if let Some(category) = patch.category {
            document.category = Some(category);
        }
        document.updated_at = Utc::now();

        Ok(document.clone())
    }

    /// Removes and returns the document so the caller can release its
    /// backing file and index entries.
    pub fn remove(&mut self, owner_id: &str, document_id: &str) -> Result<Document, StoreError> {
        match self.documents.entry(document_id.to_string()) {
            Entry::Occupied(entry) if entry.get().owner_id == owner_id => Ok(entry.remove()),
            _ => Err(StoreError::not_found(document_id)),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn compare_by_field(left: &Document, right: &Document, field: SortField) -> Ordering {
    match field {
        SortField::Title => left.title.cmp(&right.title),
        SortField::FileName => left.file_name.cmp(&right.file_name),
        SortField::FileSize => left.file_size_bytes.cmp(&right.file_size_bytes),
        SortField::WordCount => left.word_count.cmp(&right.word_count),
        SortField::Category => left.category.cmp(&right.category),
        SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
    }
}
