//! Direct text extraction from a PDF's native text layer.

use lopdf::Document;

use super::error::{PdfError, Result};

/// Concatenate the text content of every page, in page order.
///
/// A structurally valid PDF with no text layer (a pure scan) yields an
/// empty or near-empty string rather than an error; deciding what to do
/// about that is the orchestrator's job.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes).map_err(|e| PdfError::InvalidPdf(e.to_string()))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Ok(String::new());
    }

    document
        .extract_text(&page_numbers)
        .map_err(|e| PdfError::TextExtractionFailed(e.to_string()))
}
