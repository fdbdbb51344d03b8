use crate::models::Document;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being",
        "to", "of", "in", "on", "at", "for", "with", "by", "from", "as", "that", "this", "these",
        "those", "it", "its", "he", "she", "they", "them", "his", "her", "their", "we", "us",
        "our", "you", "your", "not", "no", "do", "does", "did", "have", "has", "had", "will",
        "would", "can", "could", "should", "into", "over", "under", "than", "then", "there",
        "here", "what", "which", "who", "when", "where", "why", "how", "all", "each", "some",
        "such", "same", "so", "too", "very",
    ]
    .into_iter()
    .collect()
});

static NON_TERM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("term pattern compiles"));

/// Normalizes text into distinct search terms.
///
/// Lowercases, strips punctuation, splits on whitespace, then drops terms of
/// two characters or fewer and stop words. The result is de-duplicated while
/// preserving first-appearance order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = NON_TERM_CHARS.replace_all(&lowered, "");

    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for word in stripped.split_whitespace() {
        if word.chars().count() <= 2 || STOP_WORDS.contains(word) {
            continue;
        }
        if seen.insert(word.to_string()) {
            terms.push(word.to_string());
        }
    }
    terms
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub document_id: String,
    pub owner_id: String,
}

/// Inverted index mapping normalized terms to the documents containing them.
///
/// Records term presence only; occurrence frequency is recomputed from chunk
/// text at query time.
#[derive(Debug, Default)]
pub struct TermIndex {
    entries: HashMap<String, Vec<DocumentRef>>,
}

impl TermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference for every distinct term in the document's text.
    /// Indexing the same document twice does not duplicate references.
    pub fn insert_document(&mut self, document: &Document) {
        for term in tokenize(&document.extracted_text) {
            let entry = self.entries.entry(term).or_default();
            if !entry
                .iter()
                .any(|reference| reference.document_id == document.id)
            {
                entry.push(DocumentRef {
                    document_id: document.id.clone(),
                    owner_id: document.owner_id.clone(),
                });
            }
        }
    }

    /// Strips every reference to the document; entries left empty are dropped.
    pub fn remove_document(&mut self, document_id: &str) {
        self.entries.retain(|_, references| {
            references.retain(|reference| reference.document_id != document_id);
            !references.is_empty()
        });
    }

    pub fn lookup(&self, term: &str) -> &[DocumentRef] {
        self.entries
            .get(term)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn term_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentStatus, MediaType};
    use chrono::Utc;

    fn document(id: &str, owner_id: &str, text: &str) -> Document {
        Document {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: id.to_string(),
            description: None,
            category: None,
            file_name: format!("{id}.txt"),
            file_size_bytes: text.len() as u64,
            media_type: MediaType::PlainText,
            file_path: format!("blobs/{id}.txt"),
            checksum: String::new(),
            extracted_text: text.to_string(),
            chunks: Vec::new(),
            word_count: text.split_whitespace().count(),
            status: DocumentStatus::Processed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tokenize_drops_stop_words_and_short_terms() {
        let terms = tokenize("The pump is at a THRESHOLD, ok?");
        assert_eq!(terms, vec!["pump", "threshold"]);
    }

    #[test]
    fn tokenize_strips_punctuation_inside_words() {
        let terms = tokenize("don't re-index");
        assert_eq!(terms, vec!["dont", "reindex"]);
    }

    #[test]
    fn tokenize_deduplicates_preserving_first_seen_order() {
        let terms = tokenize("banana apple banana cherry apple");
        assert_eq!(terms, vec!["banana", "apple", "cherry"]);
    }

    #[test]
    fn indexed_terms_reference_the_document() {
        let mut index = TermIndex::new();
        index.insert_document(&document("doc-1", "user-1", "hydraulic pump manual"));

        let refs = index.lookup("hydraulic");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].document_id, "doc-1");
        assert_eq!(refs[0].owner_id, "user-1");
        assert!(index.lookup("the").is_empty());
    }

    #[test]
    fn every_term_of_an_indexed_document_is_retrievable() {
        let doc = document(
            "doc-1",
            "user-1",
            "Hydraulic pumps require regular pressure checks.",
        );
        let mut index = TermIndex::new();
        index.insert_document(&doc);

        let terms = tokenize(&doc.extracted_text);
        assert!(!terms.is_empty());
        for term in terms {
            assert!(
                index
                    .lookup(&term)
                    .iter()
                    .any(|reference| reference.document_id == "doc-1"),
                "term {term} lost its reference"
            );
        }
    }

    #[test]
    fn indexing_twice_does_not_duplicate_references() {
        let mut index = TermIndex::new();
        let doc = document("doc-1", "user-1", "pressure valve");
        index.insert_document(&doc);
        index.insert_document(&doc);

        assert_eq!(index.lookup("pressure").len(), 1);
        assert_eq!(index.lookup("valve").len(), 1);
    }

    #[test]
    fn removal_drops_entries_that_become_empty() {
        let mut index = TermIndex::new();
        index.insert_document(&document("doc-1", "user-1", "hello world"));
        index.insert_document(&document("doc-2", "user-1", "hello rust"));

        index.remove_document("doc-1");

        assert!(index.lookup("world").is_empty());
        let refs = index.lookup("hello");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].document_id, "doc-2");
    }

    #[test]
    fn removing_unknown_document_is_a_no_op() {
        let mut index = TermIndex::new();
        index.insert_document(&document("doc-1", "user-1", "hello world"));
        index.remove_document("doc-99");
        assert_eq!(index.lookup("hello").len(), 1);
    }
}
