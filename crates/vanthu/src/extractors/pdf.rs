//! PDF extractor: native text layer only.

use async_trait::async_trait;

use super::{FormatExtractor, PDF_MIME_TYPE};
use crate::error::Result;
use crate::pdf;

/// Extracts the text-bearing content streams of a PDF, concatenated in page
/// order. Scanned documents come back empty; that is reported as success so
/// the pipeline's sufficiency check, not this extractor, decides on OCR.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormatExtractor for PdfTextExtractor {
    fn name(&self) -> &str {
        "pdf-text"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[PDF_MIME_TYPE]
    }

    fn supports_ocr_fallback(&self) -> bool {
        true
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(pdf::text::extract_text_from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::pdf_with_text;

    #[tokio::test]
    async fn test_extracts_text_layer() {
        let extractor = PdfTextExtractor::new();
        let bytes = pdf_with_text(&["Quyet dinh so 45 ve viec xep hang di tich"]);
        let text = extractor.extract(&bytes).await.unwrap();
        assert!(text.contains("di tich"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(b"garbage bytes").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_declares_ocr_fallback() {
        assert!(PdfTextExtractor::new().supports_ocr_fallback());
    }
}
