//! DOCX extractor using docx-lite streaming body extraction.

use async_trait::async_trait;

use super::{DOCX_MIME_TYPE, FormatExtractor};
use crate::error::{Result, VanthuError};

pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormatExtractor for DocxExtractor {
    fn name(&self) -> &str {
        "docx"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[DOCX_MIME_TYPE]
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        docx_lite::extract_text_from_bytes(bytes)
            .map_err(|e| VanthuError::parsing(format!("DOCX body extraction failed: {e}")))
    }
}
