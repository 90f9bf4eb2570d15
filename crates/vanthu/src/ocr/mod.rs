//! Optical character recognition over rasterized PDF pages.
//!
//! The entry point is [`DocumentOcr::ocr_pdf`]: render every page, normalize
//! each bitmap, recognize, and join the per-page texts in page order. One
//! worker serves the whole document and is torn down when the pass ends.

pub mod error;
pub mod preprocess;
pub mod worker;

pub use error::OcrError;
pub use worker::{OcrWorker, with_worker};

use crate::config::{OcrConfig, RenderOptions};
use crate::pdf::{PdfError, PdfRasterizer};
use crate::types::PageImage;

/// Document-level OCR behind a seam so the pipeline can be exercised with a
/// scripted engine in tests.
pub trait DocumentOcr: Send + Sync {
    /// OCR every page of a PDF, in page order, joined with newlines.
    ///
    /// Worker initialization failure is fatal for the document. A failure on
    /// an individual page is not: that page contributes an empty string and
    /// processing continues.
    fn ocr_pdf(&self, pdf_bytes: &[u8]) -> error::Result<String>;
}

/// Recognizes one page bitmap. Implemented by [`OcrWorker`]; test doubles
/// implement it to script per-page failures.
pub trait PageRecognizer {
    fn recognize_page(&self, page: &PageImage) -> error::Result<String>;
}

impl PageRecognizer for OcrWorker {
    fn recognize_page(&self, page: &PageImage) -> error::Result<String> {
        self.recognize(page)
    }
}

/// Production engine: Pdfium rasterization, image normalization, Tesseract
/// recognition.
pub struct PdfOcrEngine {
    render: RenderOptions,
    ocr: OcrConfig,
}

impl PdfOcrEngine {
    pub fn new(render: RenderOptions, ocr: OcrConfig) -> Self {
        Self { render, ocr }
    }
}

impl DocumentOcr for PdfOcrEngine {
    fn ocr_pdf(&self, pdf_bytes: &[u8]) -> error::Result<String> {
        let rasterizer = PdfRasterizer::new()
            .map_err(|e| OcrError::InitializationFailed(format!("PDF renderer unavailable: {e}")))?;
        let page_count = rasterizer
            .page_count(pdf_bytes)
            .map_err(|e| OcrError::ImageProcessingFailed(format!("failed to read page count: {e}")))?;

        with_worker(&self.ocr, |w| {
            let pages = (0..page_count).map(|index| {
                rasterizer
                    .render_page(pdf_bytes, index, &self.render)
                    .map(preprocess::normalize)
            });
            Ok(recognize_pages(w, pages))
        })
    }
}

/// Run recognition over pages in order, absorbing page-scoped failures.
///
/// A page that fails to rasterize or recognize contributes an empty string
/// so the surviving pages keep their document positions; the failure is
/// logged, never propagated.
pub(crate) fn recognize_pages<R: PageRecognizer>(
    recognizer: &R,
    pages: impl Iterator<Item = std::result::Result<PageImage, PdfError>>,
) -> String {
    let mut texts = Vec::new();
    for (index, page) in pages.enumerate() {
        let text = match page {
            Ok(page) => match recognizer.recognize_page(&page) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(page = index, error = %err, "page recognition failed, contributing empty text");
                    String::new()
                }
            },
            Err(err) => {
                tracing::warn!(page = index, error = %err, "page rasterization failed, contributing empty text");
                String::new()
            }
        };
        texts.push(text);
    }
    texts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage};

    fn blank_page() -> PageImage {
        PageImage::new(DynamicImage::ImageLuma8(GrayImage::from_raw(2, 2, vec![255; 4]).unwrap()))
    }

    struct ScriptedRecognizer {
        /// Per-call results, consumed in order.
        script: std::cell::RefCell<Vec<error::Result<String>>>,
    }

    impl ScriptedRecognizer {
        fn new(script: Vec<error::Result<String>>) -> Self {
            Self {
                script: std::cell::RefCell::new(script),
            }
        }
    }

    impl PageRecognizer for ScriptedRecognizer {
        fn recognize_page(&self, _page: &PageImage) -> error::Result<String> {
            self.script.borrow_mut().remove(0)
        }
    }

    #[test]
    fn test_pages_joined_in_order() {
        let recognizer = ScriptedRecognizer::new(vec![Ok("trang mot".to_string()), Ok("trang hai".to_string())]);
        let pages = vec![Ok(blank_page()), Ok(blank_page())];
        let text = recognize_pages(&recognizer, pages.into_iter());
        assert_eq!(text, "trang mot\ntrang hai");
    }

    #[test]
    fn test_failed_page_keeps_position() {
        let recognizer = ScriptedRecognizer::new(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Err(OcrError::RecognitionFailed("engine hiccup".to_string())),
            Ok("four".to_string()),
            Ok("five".to_string()),
        ]);
        let pages = (0..5).map(|_| Ok(blank_page()));
        let text = recognize_pages(&recognizer, pages);
        assert_eq!(text, "one\ntwo\n\nfour\nfive");
    }

    #[test]
    fn test_rasterization_failure_absorbed() {
        let recognizer = ScriptedRecognizer::new(vec![Ok("only page".to_string())]);
        let pages = vec![Err(PdfError::RenderingFailed("bitmap allocation".to_string())), Ok(blank_page())];
        let text = recognize_pages(&recognizer, pages.into_iter());
        assert_eq!(text, "\nonly page");
    }

    #[test]
    fn test_all_pages_failing_yields_separators_only() {
        let recognizer = ScriptedRecognizer::new(vec![
            Err(OcrError::RecognitionFailed("a".to_string())),
            Err(OcrError::RecognitionFailed("b".to_string())),
        ]);
        let pages = (0..2).map(|_| Ok(blank_page()));
        let text = recognize_pages(&recognizer, pages);
        assert_eq!(text, "\n");
    }

    #[test]
    fn test_empty_document() {
        let recognizer = ScriptedRecognizer::new(vec![]);
        let text = recognize_pages(&recognizer, std::iter::empty());
        assert_eq!(text, "");
    }
}
