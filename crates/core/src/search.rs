use crate::error::SearchError;
use crate::index::{tokenize, TermIndex};
use crate::models::{
    DocumentStatus, DocumentSummary, ScoredChunk, SearchOptions, SearchResult, TextChunk,
};
use crate::store::DocumentStore;
use std::collections::HashMap;

/// Number of excerpt chunks reported per search result.
pub const MAX_RELEVANT_CHUNKS: usize = 3;

/// Scores candidate documents by the number of distinct query terms each one
/// contains. Candidates keep index discovery order, so equal scores stay in a
/// stable order after the descending sort.
pub fn rank_documents(
    index: &TermIndex,
    terms: &[String],
    owner_id: &str,
) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut scores: HashMap<String, usize> = HashMap::new();

    for term in terms {
        for reference in index.lookup(term) {
            if reference.owner_id != owner_id {
                continue;
            }
            let counter = scores.entry(reference.document_id.clone()).or_insert_with(|| {
                order.push(reference.document_id.clone());
                0
            });
            *counter += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|document_id| {
            let score = scores[&document_id];
            (document_id, score)
        })
        .collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked
}

/// Scores each chunk by total query-term occurrences (frequency, not mere
/// presence) and keeps the top scoring chunks with at least one hit.
pub fn score_chunks(chunks: &[TextChunk], terms: &[String]) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunks
        .iter()
        .filter_map(|chunk| {
            let lowered = chunk.text.to_lowercase();
            let score: usize = terms
                .iter()
                .map(|term| lowered.matches(term.as_str()).count())
                .sum();
            (score > 0).then(|| ScoredChunk {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|left, right| right.score.cmp(&left.score));
    scored.truncate(MAX_RELEVANT_CHUNKS);
    scored
}

/// Query terms that literally appear in the text, case-insensitively.
pub fn matched_terms(text: &str, terms: &[String]) -> Vec<String> {
    let lowered = text.to_lowercase();
    terms
        .iter()
        .filter(|term| lowered.contains(term.as_str()))
        .cloned()
        .collect()
}

pub(crate) fn run_search(
    store: &DocumentStore,
    index: &TermIndex,
    query: &str,
    owner_id: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchResult>, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    let terms = tokenize(query);
    let ranked = rank_documents(index, &terms, owner_id);

    let mut results = Vec::new();
    for (document_id, score) in ranked.into_iter().take(options.limit) {
        let Some(document) = store.peek(&document_id) else {
            continue;
        };
        if document.owner_id != owner_id || document.status != DocumentStatus::Processed {
            continue;
        }
        if let Some(category) = options.category.as_deref() {
            if document.category.as_deref() != Some(category) {
                continue;
            }
        }

        results.push(SearchResult {
            document: DocumentSummary::from(document),
            score,
            relevant_chunks: score_chunks(&document.chunks, &terms),
            matched_terms: matched_terms(&document.extracted_text, &terms),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, MediaType};
    use chrono::Utc;

    fn document(id: &str, owner_id: &str, text: &str) -> Document {
        let chunks = vec![TextChunk {
            text: text.to_string(),
            start_index: 0,
            word_count: text.split_whitespace().count(),
        }];
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
            chunks,
            word_count: text.split_whitespace().count(),
            status: DocumentStatus::Processed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn populated(documents: Vec<Document>) -> (DocumentStore, TermIndex) {
        let mut store = DocumentStore::new();
        let mut index = TermIndex::new();
        for doc in documents {
            index.insert_document(&doc);
            store.insert(doc);
        }
        (store, index)
    }

    #[test]
    fn empty_query_is_rejected() {
        let (store, index) = populated(vec![document("doc-1", "user-a", "anything")]);
        let result = run_search(&store, &index, "   ", "user-a", &SearchOptions::default());
        assert!(matches!(result, Err(SearchError::InvalidQuery)));
    }

    #[test]
    fn no_matches_returns_empty_sequence() {
        let (store, index) = populated(vec![document("doc-1", "user-a", "hydraulic pump")]);
        let results =
            run_search(&store, &index, "nonexistent", "user-a", &SearchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn single_term_matches_only_the_containing_document() {
        let (store, index) = populated(vec![
            document("doc-1", "user-a", "authentication tokens expire daily"),
            document("doc-2", "user-a", "pump maintenance schedule"),
        ]);

        let results = run_search(
            &store,
            &index,
            "authentication",
            "user-a",
            &SearchOptions::default(),
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "doc-1");
        assert_eq!(results[0].score, 1);
    }

    #[test]
    fn documents_rank_by_distinct_matching_terms() {
        let (store, index) = populated(vec![
            document("doc-1", "user-a", "valve"),
            document("doc-2", "user-a", "valve pump gasket"),
            document("doc-3", "user-a", "valve pump"),
        ]);

        let results = run_search(
            &store,
            &index,
            "valve pump gasket",
            "user-a",
            &SearchOptions::default(),
        )
        .unwrap();

        let ids: Vec<&str> = results
            .iter()
            .map(|result| result.document.id.as_str())
            .collect();
        assert_eq!(ids, vec!["doc-2", "doc-3", "doc-1"]);
        assert_eq!(results[0].score, 3);
        assert_eq!(results[1].score, 2);
        assert_eq!(results[2].score, 1);
    }

    #[test]
    fn repeated_occurrences_count_once_at_document_level() {
        let (store, index) = populated(vec![document(
            "doc-1",
            "user-a",
            "valve valve valve valve",
        )]);

        let results =
            run_search(&store, &index, "valve", "user-a", &SearchOptions::default()).unwrap();
        assert_eq!(results[0].score, 1);
    }

    #[test]
    fn results_never_cross_owners() {
        let (store, index) = populated(vec![
            document("doc-1", "user-a", "hydraulic pressure limits"),
            document("doc-2", "user-b", "hydraulic pressure limits"),
        ]);

        let results = run_search(
            &store,
            &index,
            "hydraulic pressure",
            "user-a",
            &SearchOptions::default(),
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.owner_id, "user-a");
    }

    #[test]
    fn limit_caps_results_before_category_filtering() {
        let mut winner = document("doc-1", "user-a", "valve pump gasket");
        winner.category = Some("general".to_string());
        let mut runner_up = document("doc-2", "user-a", "valve");
        runner_up.category = Some("manuals".to_string());
        let (store, index) = populated(vec![winner, runner_up]);

        let options = SearchOptions {
            limit: 1,
            category: Some("manuals".to_string()),
        };
        let results =
            run_search(&store, &index, "valve pump gasket", "user-a", &options).unwrap();

        // The top-scoring document takes the single slot, then fails the
        // category filter, so the lower-ranked match is not promoted.
        assert!(results.is_empty());
    }

    #[test]
    fn chunk_scores_count_raw_occurrences() {
        let chunks = vec![
            TextChunk {
                text: "valve once".to_string(),
                start_index: 0,
                word_count: 2,
            },
            TextChunk {
                text: "valve valve valve".to_string(),
                start_index: 2,
                word_count: 3,
            },
            TextChunk {
                text: "nothing relevant".to_string(),
                start_index: 5,
                word_count: 2,
            },
        ];

        let scored = score_chunks(&chunks, &["valve".to_string()]);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].score, 3);
        assert_eq!(scored[0].chunk.start_index, 2);
        assert_eq!(scored[1].score, 1);
    }

    #[test]
    fn at_most_three_chunks_are_reported() {
        let chunks: Vec<TextChunk> = (0..5)
            .map(|offset| TextChunk {
                text: "valve ".repeat(offset + 1).trim().to_string(),
                start_index: offset,
                word_count: offset + 1,
            })
            .collect();

        let scored = score_chunks(&chunks, &["valve".to_string()]);
        assert_eq!(scored.len(), MAX_RELEVANT_CHUNKS);
        assert_eq!(scored[0].score, 5);
    }

    #[test]
    fn matched_terms_use_case_insensitive_substring_presence() {
        let matched = matched_terms(
            "Authentication requires a valid Token",
            &["auth".to_string(), "token".to_string(), "pump".to_string()],
        );
        assert_eq!(matched, vec!["auth", "token"]);
    }
}
