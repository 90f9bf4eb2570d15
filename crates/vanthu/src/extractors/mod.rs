//! Format-specific text extractors.
//!
//! Each supported binary format gets one extractor implementing
//! [`FormatExtractor`]; dispatch is a MIME-type table, so adding a format
//! means one new extractor plus one registration, never another branch in
//! the pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub mod doc;
pub mod docx;
pub mod pdf;

pub use doc::LegacyDocExtractor;
pub use docx::DocxExtractor;
pub use pdf::PdfTextExtractor;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME_TYPE: &str = "application/msword";

/// Attempts direct text extraction from one binary format.
///
/// Extraction is a pure transformation over the provided buffer; extractors
/// hold no state and perform no side effects. A structural failure is an
/// error result, which the pipeline may recover from (OCR for formats that
/// report `supports_ocr_fallback`).
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn supported_mime_types(&self) -> &[&'static str];

    /// Whether the pipeline may rasterize and OCR this format when direct
    /// extraction fails or comes back insubstantial.
    fn supports_ocr_fallback(&self) -> bool {
        false
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// MIME type → extractor dispatch table.
#[derive(Clone)]
pub struct ExtractorRegistry {
    by_mime: HashMap<&'static str, Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self { by_mime: HashMap::new() }
    }

    /// The built-in set: PDF plus both Word generations.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfTextExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(LegacyDocExtractor::new()));
        registry
    }

    /// Register an extractor under every MIME type it declares. A later
    /// registration for the same type replaces the earlier one.
    pub fn register(&mut self, extractor: Arc<dyn FormatExtractor>) {
        for mime in extractor.supported_mime_types() {
            self.by_mime.insert(mime, Arc::clone(&extractor));
        }
    }

    pub fn for_mime_type(&self, mime_type: &str) -> Option<Arc<dyn FormatExtractor>> {
        self.by_mime.get(mime_type).cloned()
    }

    pub fn supported_mime_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.by_mime.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
