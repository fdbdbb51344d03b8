use crate::error::IngestError;
use crate::models::MediaType;
use lopdf::Document;

/// Converts an uploaded buffer into plain text for the declared media type.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<String, IngestError>;
}

#[derive(Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<String, IngestError> {
        match media_type {
            MediaType::Pdf => extract_pdf_text(bytes),
            MediaType::PlainText | MediaType::Markdown => {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

pub fn extract_text(bytes: &[u8], media_type: MediaType) -> Result<String, IngestError> {
    DocumentExtractor.extract(bytes, media_type)
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, IngestError> {
    let document =
        Document::load_mem(bytes).map_err(|error| IngestError::ExtractionFailed(error.to_string()))?;

    let mut pages = Vec::new();
    for (page_no, _page_id) in document.get_pages() {
        let text = document
            .extract_text(&[page_no])
            .map_err(|error| IngestError::ExtractionFailed(error.to_string()))?;

        if !text.trim().is_empty() {
            pages.push(text);
        }
    }

    if pages.is_empty() {
        return Err(IngestError::ExtractionFailed(
            "pdf had no readable page text".to_string(),
        ));
    }

    Ok(pages.join("\n"))
}
