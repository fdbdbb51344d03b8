use crate::error::IngestError;
use crate::models::{IngestionOptions, TextChunk};

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub window_words: usize,
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_words: 1_000,
            overlap_words: 100,
        }
    }
}

impl From<&IngestionOptions> for ChunkingConfig {
    fn from(options: &IngestionOptions) -> Self {
        Self {
            window_words: options.window_words,
            overlap_words: options.overlap_words,
        }
    }
}

impl ChunkingConfig {
    fn validate(&self) -> Result<(), IngestError> {
        if self.window_words == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "window_words must be positive".to_string(),
            ));
        }
        if self.overlap_words >= self.window_words {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap_words {} must be smaller than window_words {}",
                self.overlap_words, self.window_words
            )));
        }
        Ok(())
    }
}

/// Splits text into overlapping fixed-size word windows.
///
/// Windows advance by `window_words - overlap_words`; a text shorter than one
/// window yields a single chunk covering the whole text, and whitespace-only
/// input yields none.
pub fn build_chunks(text: &str, config: ChunkingConfig) -> Result<Vec<TextChunk>, IngestError> {
    config.validate()?;

    let words: Vec<&str> = text.split_whitespace().collect();
    let stride = config.window_words - config.overlap_words;

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + config.window_words).min(words.len());
        let window = &words[start..end];

        chunks.push(TextChunk {
            text: window.join(" "),
            start_index: start,
            word_count: window.len(),
        });

        if end == words.len() {
            break;
        }
        start += stride;
    }

    Ok(chunks)
}
