//! Core data types shared across the extraction pipeline.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::text::normalize_file_name;

/// An uploaded file as it enters the pipeline.
///
/// Immutable once constructed. The file name is normalized from the legacy
/// byte encoding exactly once, here at the boundary; every later consumer
/// (storage, extraction, response assembly) sees the canonical name.
#[derive(Debug, Clone)]
pub struct IngestedFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    /// Logical grouping label used to route the file to a storage subfolder.
    /// Has no influence on extraction.
    pub module_tag: String,
}

impl IngestedFile {
    pub fn new(bytes: Vec<u8>, mime_type: String, raw_file_name: &str, module_tag: String) -> Self {
        Self {
            bytes,
            mime_type,
            file_name: normalize_file_name(raw_file_name),
            module_tag,
        }
    }
}

/// The single outcome of running the extraction pipeline over one file.
///
/// Exactly one variant is produced per invocation; the direct-text and OCR
/// paths are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Text recovered from the document's native text layer.
    DirectText(String),
    /// Text recovered by rasterizing pages and running OCR.
    OcrText(String),
    /// The MIME type has no extractor and no OCR fallback.
    Unsupported,
    /// The whole document failed, with a human-readable reason.
    Failed(String),
}

impl ExtractionOutcome {
    /// Extracted text, if either path produced any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::DirectText(text) | Self::OcrText(text) => Some(text),
            Self::Unsupported | Self::Failed(_) => None,
        }
    }

    /// The failure reason, for the `Failed` variant only.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// The rasterized bitmap of one document page.
///
/// Owned exclusively by the rasterize → preprocess → recognize chain for the
/// duration of one page; never retained afterward.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub(crate) image: DynamicImage,
}

impl PageImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Identifier and metadata returned by the blob store after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHandle {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub view_link: String,
    pub download_link: Option<String>,
}

/// Combined result of one ingestion request: the stored blob's metadata plus
/// whatever the extraction pipeline recovered.
///
/// `extracted_text` is absent (not an error) when the file legitimately has
/// nothing extractable; `extraction_error` carries the reason when the whole
/// document failed. The blob reference is valid either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    #[serde(rename = "webViewLink")]
    pub view_link: String,
    #[serde(rename = "downloadLink", skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(rename = "extractedText", skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(rename = "extractionError", skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl IngestResponse {
    /// Assemble the response from the stored handle and the pipeline outcome.
    pub fn assemble(handle: BlobHandle, outcome: &ExtractionOutcome) -> Self {
        let extracted_text = outcome.text().filter(|t| !t.trim().is_empty()).map(str::to_string);
        let extraction_error = outcome.failure_reason().map(str::to_string);

        Self {
            id: handle.id,
            name: handle.name,
            mime_type: handle.mime_type,
            size_bytes: handle.size_bytes,
            view_link: handle.view_link,
            download_link: handle.download_link,
            extracted_text,
            extraction_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> BlobHandle {
        BlobHandle {
            id: "abc123".to_string(),
            name: "quyet-dinh.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 1024,
            view_link: "https://drive.example/view/abc123".to_string(),
            download_link: None,
        }
    }

    #[test]
    fn test_outcome_text_accessor() {
        assert_eq!(ExtractionOutcome::DirectText("a".into()).text(), Some("a"));
        assert_eq!(ExtractionOutcome::OcrText("b".into()).text(), Some("b"));
        assert_eq!(ExtractionOutcome::Unsupported.text(), None);
        assert_eq!(ExtractionOutcome::Failed("x".into()).text(), None);
    }

    #[test]
    fn test_outcome_failure_reason() {
        assert_eq!(
            ExtractionOutcome::Failed("worker died".into()).failure_reason(),
            Some("worker died")
        );
        assert_eq!(ExtractionOutcome::DirectText("t".into()).failure_reason(), None);
    }

    #[test]
    fn test_assemble_with_text() {
        let response = IngestResponse::assemble(handle(), &ExtractionOutcome::DirectText("some text".into()));
        assert_eq!(response.extracted_text.as_deref(), Some("some text"));
        assert!(response.extraction_error.is_none());
    }

    #[test]
    fn test_assemble_empty_text_is_absent() {
        let response = IngestResponse::assemble(handle(), &ExtractionOutcome::DirectText("   ".into()));
        assert!(response.extracted_text.is_none());
    }

    #[test]
    fn test_assemble_unsupported_is_not_an_error() {
        let response = IngestResponse::assemble(handle(), &ExtractionOutcome::Unsupported);
        assert!(response.extracted_text.is_none());
        assert!(response.extraction_error.is_none());
        assert_eq!(response.id, "abc123");
    }

    #[test]
    fn test_assemble_failure_keeps_blob_reference() {
        let response = IngestResponse::assemble(handle(), &ExtractionOutcome::Failed("corrupt body".into()));
        assert_eq!(response.extraction_error.as_deref(), Some("corrupt body"));
        assert_eq!(response.id, "abc123");
        assert!(response.extracted_text.is_none());
    }

    #[test]
    fn test_ingested_file_normalizes_name_once() {
        // "Công văn.pdf" whose UTF-8 bytes were read back as latin-1.
        let file = IngestedFile::new(
            vec![1, 2, 3],
            "application/pdf".to_string(),
            "C\u{00C3}\u{00B4}ng v\u{00C4}\u{0083}n.pdf",
            "vanban".to_string(),
        );
        assert_eq!(file.file_name, "Công văn.pdf");
    }

    #[test]
    fn test_response_serialization_omits_absent_fields() {
        let response = IngestResponse::assemble(handle(), &ExtractionOutcome::Unsupported);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("extractedText"));
        assert!(!json.contains("extractionError"));
        assert!(!json.contains("downloadLink"));
        assert!(json.contains("webViewLink"));
    }
}
