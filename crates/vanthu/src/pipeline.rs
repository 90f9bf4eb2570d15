//! Extraction orchestration: extractor dispatch, the sufficiency check and
//! the OCR fallback decision.
//!
//! The decision is deterministic: identical bytes under the same
//! configuration always take the same path, so test runs and re-ingestions
//! reproduce byte-for-byte.

use std::sync::Arc;

use crate::config::ExtractionOptions;
use crate::extractors::ExtractorRegistry;
use crate::ocr::DocumentOcr;
use crate::types::{ExtractionOutcome, IngestedFile};

/// The core decision engine: one [`extract`](Self::extract) call per
/// ingested file, one [`ExtractionOutcome`] back.
pub struct Orchestrator {
    registry: ExtractorRegistry,
    options: ExtractionOptions,
    ocr: Arc<dyn DocumentOcr>,
}

impl Orchestrator {
    pub fn new(options: ExtractionOptions, ocr: Arc<dyn DocumentOcr>) -> Self {
        Self::with_registry(ExtractorRegistry::with_defaults(), options, ocr)
    }

    /// Construct with a custom dispatch table; tests use this to substitute
    /// scripted extractors.
    pub fn with_registry(registry: ExtractorRegistry, options: ExtractionOptions, ocr: Arc<dyn DocumentOcr>) -> Self {
        Self { registry, options, ocr }
    }

    /// Run the pipeline over one file.
    ///
    /// 1. Select the extractor by declared MIME type; none → `Unsupported`.
    /// 2. Attempt direct extraction. A hard failure falls through to OCR
    ///    for formats that support it, otherwise the document fails.
    /// 3. Accept substantial direct text as `DirectText`; insubstantial
    ///    text on an OCR-capable format means the document is a scan.
    /// 4. OCR renders, normalizes and recognizes every page in order.
    pub async fn extract(&self, file: &IngestedFile) -> ExtractionOutcome {
        let Some(extractor) = self.registry.for_mime_type(&file.mime_type) else {
            tracing::debug!(mime_type = %file.mime_type, "no extractor for MIME type");
            return ExtractionOutcome::Unsupported;
        };

        match extractor.extract(&file.bytes).await {
            Ok(text) => {
                if self.is_substantial(&text) || !extractor.supports_ocr_fallback() {
                    ExtractionOutcome::DirectText(text)
                } else {
                    tracing::debug!(
                        file_name = %file.file_name,
                        chars = text.trim().chars().count(),
                        "direct text below threshold, treating document as scanned"
                    );
                    self.ocr_fallback(&file.bytes).await
                }
            }
            Err(err) if extractor.supports_ocr_fallback() => {
                tracing::debug!(file_name = %file.file_name, error = %err, "direct extraction failed, falling back to OCR");
                self.ocr_fallback(&file.bytes).await
            }
            Err(err) => ExtractionOutcome::Failed(format!("{} extraction failed: {err}", extractor.name())),
        }
    }

    fn is_substantial(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.options.min_direct_text_chars
    }

    /// OCR runs on the blocking pool: recognition is CPU-bound and must not
    /// stall the request executor. The worker is acquired and released
    /// inside the blocking task, so its teardown does not depend on this
    /// future being polled to completion.
    async fn ocr_fallback(&self, bytes: &[u8]) -> ExtractionOutcome {
        let engine = Arc::clone(&self.ocr);
        let bytes = bytes.to_vec();

        match tokio::task::spawn_blocking(move || engine.ocr_pdf(&bytes)).await {
            Ok(Ok(text)) => ExtractionOutcome::OcrText(text),
            Ok(Err(err)) => ExtractionOutcome::Failed(format!("OCR failed: {err}")),
            Err(err) => ExtractionOutcome::Failed(format!("OCR task did not complete: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VanthuError;
    use crate::extractors::{FormatExtractor, PDF_MIME_TYPE};
    use crate::ocr::OcrError;
    use crate::pdf::fixtures::pdf_with_text;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted document-level OCR engine.
    struct FakeOcr {
        result: Result<String, OcrError>,
        calls: AtomicUsize,
    }

    impl FakeOcr {
        fn returning(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_init() -> Self {
            Self {
                result: Err(OcrError::InitializationFailed("vie.traineddata missing".to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl crate::ocr::DocumentOcr for FakeOcr {
        fn ocr_pdf(&self, _pdf_bytes: &[u8]) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct FailingExtractor {
        fallback: bool,
    }

    #[async_trait]
    impl FormatExtractor for FailingExtractor {
        fn name(&self) -> &str {
            "failing"
        }
        fn supported_mime_types(&self) -> &[&'static str] {
            &["application/x-test"]
        }
        fn supports_ocr_fallback(&self) -> bool {
            self.fallback
        }
        async fn extract(&self, _bytes: &[u8]) -> crate::error::Result<String> {
            Err(VanthuError::parsing("unreadable body"))
        }
    }

    fn file(bytes: Vec<u8>, mime_type: &str) -> IngestedFile {
        IngestedFile::new(bytes, mime_type.to_string(), "test.bin", "vanban".to_string())
    }

    fn orchestrator(ocr: Arc<FakeOcr>) -> Orchestrator {
        Orchestrator::new(ExtractionOptions::default(), ocr)
    }

    #[tokio::test]
    async fn test_unsupported_mime_type() {
        let ocr = Arc::new(FakeOcr::returning("should not run"));
        let orchestrator = orchestrator(Arc::clone(&ocr));
        let outcome = orchestrator.extract(&file(vec![1, 2, 3], "application/vnd.ms-excel")).await;
        assert_eq!(outcome, ExtractionOutcome::Unsupported);
        assert_eq!(ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_substantial_direct_text_skips_ocr() {
        let ocr = Arc::new(FakeOcr::returning("should not run"));
        let orchestrator = orchestrator(Arc::clone(&ocr));
        // Four long lines clear the 100-character threshold comfortably.
        let line = "Trung tam luu tru quoc gia thong bao ve viec tiep nhan tai lieu nam 2024";
        let bytes = pdf_with_text(&[line, line, line, line]);

        let outcome = orchestrator.extract(&file(bytes, PDF_MIME_TYPE)).await;
        match outcome {
            ExtractionOutcome::DirectText(text) => assert!(text.contains("luu tru quoc gia")),
            other => panic!("expected DirectText, got {other:?}"),
        }
        assert_eq!(ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_direct_text_falls_back_to_ocr() {
        let ocr = Arc::new(FakeOcr::returning("Công văn số 123\nCông văn số 123"));
        let orchestrator = orchestrator(Arc::clone(&ocr));
        let bytes = pdf_with_text(&["stamp"]);

        let outcome = orchestrator.extract(&file(bytes, PDF_MIME_TYPE)).await;
        assert_eq!(
            outcome,
            ExtractionOutcome::OcrText("Công văn số 123\nCông văn số 123".to_string())
        );
        assert_eq!(ocr.calls(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_falls_back_to_ocr() {
        let ocr = Arc::new(FakeOcr::returning("recovered by ocr"));
        let orchestrator = orchestrator(Arc::clone(&ocr));

        let outcome = orchestrator
            .extract(&file(b"%PDF-mangled beyond repair".to_vec(), PDF_MIME_TYPE))
            .await;
        assert_eq!(outcome, ExtractionOutcome::OcrText("recovered by ocr".to_string()));
        assert_eq!(ocr.calls(), 1);
    }

    #[tokio::test]
    async fn test_ocr_init_failure_is_document_fatal() {
        let ocr = Arc::new(FakeOcr::failing_init());
        let orchestrator = orchestrator(Arc::clone(&ocr));
        let bytes = pdf_with_text(&["stamp"]);

        let outcome = orchestrator.extract(&file(bytes, PDF_MIME_TYPE)).await;
        match outcome {
            ExtractionOutcome::Failed(reason) => assert!(reason.contains("vie.traineddata")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extractor_failure_without_fallback() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Arc::new(FailingExtractor { fallback: false }));
        let ocr = Arc::new(FakeOcr::returning("should not run"));
        let orchestrator = Orchestrator::with_registry(registry, ExtractionOptions::default(), ocr.clone());

        let outcome = orchestrator.extract(&file(vec![0], "application/x-test")).await;
        match outcome {
            ExtractionOutcome::Failed(reason) => assert!(reason.contains("unreadable body")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_text_without_fallback_is_accepted() {
        struct ShortText;

        #[async_trait]
        impl FormatExtractor for ShortText {
            fn name(&self) -> &str {
                "short"
            }
            fn supported_mime_types(&self) -> &[&'static str] {
                &["application/x-short"]
            }
            async fn extract(&self, _bytes: &[u8]) -> crate::error::Result<String> {
                Ok("ngắn".to_string())
            }
        }

        let mut registry = ExtractorRegistry::new();
        registry.register(Arc::new(ShortText));
        let ocr = Arc::new(FakeOcr::returning("should not run"));
        let orchestrator = Orchestrator::with_registry(registry, ExtractionOptions::default(), ocr.clone());

        let outcome = orchestrator.extract(&file(vec![0], "application/x-short")).await;
        assert_eq!(outcome, ExtractionOutcome::DirectText("ngắn".to_string()));
        assert_eq!(ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_deterministic_outcome_for_identical_bytes() {
        let ocr = Arc::new(FakeOcr::returning("ocr text"));
        let orchestrator = orchestrator(ocr);
        let bytes = pdf_with_text(&["stamp"]);

        let first = orchestrator.extract(&file(bytes.clone(), PDF_MIME_TYPE)).await;
        let second = orchestrator.extract(&file(bytes, PDF_MIME_TYPE)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let ocr = Arc::new(FakeOcr::returning("should not run"));
        let options = ExtractionOptions { min_direct_text_chars: 3 };
        let orchestrator = Orchestrator::new(options, ocr.clone());
        let bytes = pdf_with_text(&["stamp"]);

        let outcome = orchestrator.extract(&file(bytes, PDF_MIME_TYPE)).await;
        assert!(matches!(outcome, ExtractionOutcome::DirectText(_)));
        assert_eq!(ocr.calls(), 0);
    }
}
