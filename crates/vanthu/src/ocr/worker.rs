//! Scoped OCR worker lifecycle.
//!
//! A worker is one initialized Tesseract instance bound to a language pack.
//! Initialization is expensive (the language model is loaded from disk), so
//! a worker is acquired once per document, reused across pages, and released
//! when the scope ends. Release is structural: the guard's `Drop` runs on
//! success, error and unwind alike, so a worker can never leak past the
//! pipeline invocation that created it.

use std::path::Path;

use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use super::error::{OcrError, Result};
use crate::config::OcrConfig;
use crate::types::PageImage;

/// One initialized recognition worker. Dropping it tears the engine down.
pub struct OcrWorker {
    api: TesseractAPI,
    language: String,
}

impl OcrWorker {
    /// Initialize a worker for the configured language.
    ///
    /// The `.traineddata` assets are checked up front: Tesseract can abort
    /// the process instead of returning an error when they are missing.
    pub fn acquire(config: &OcrConfig) -> Result<Self> {
        if config.language.trim().is_empty() {
            return Err(OcrError::InvalidConfiguration("language must not be empty".to_string()));
        }

        for lang in config.language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
            let traineddata = config.tessdata_dir.join(format!("{lang}.traineddata"));
            if !traineddata.exists() {
                return Err(OcrError::MissingLanguageData(format!(
                    "language '{}' not found: {}",
                    lang,
                    traineddata.display()
                )));
            }
        }

        let api = TesseractAPI::new()
            .map_err(|e| OcrError::InitializationFailed(format!("failed to create Tesseract engine: {e}")))?;
        let datapath = datapath_str(&config.tessdata_dir)?;

        api.init(&datapath, &config.language).map_err(|e| {
            OcrError::InitializationFailed(format!("failed to initialize language '{}': {e}", config.language))
        })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(i32::from(config.psm)))
            .map_err(|e| OcrError::InvalidConfiguration(format!("failed to set page segmentation mode: {e}")))?;

        Ok(Self {
            api,
            language: config.language.clone(),
        })
    }

    /// Recognize text on one preprocessed page.
    ///
    /// Errors are typed so the caller can distinguish "the engine failed"
    /// from "the page carries no text" (which yields an empty string).
    pub fn recognize(&self, page: &PageImage) -> Result<String> {
        let gray = page.image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::ImageProcessingFailed("empty page bitmap".to_string()));
        }

        self.api
            .set_image(gray.as_raw(), width as i32, height as i32, 1, width as i32)
            .map_err(|e| OcrError::RecognitionFailed(format!("failed to set page image: {e}")))?;

        self.api
            .recognize()
            .map_err(|e| OcrError::RecognitionFailed(format!("recognition failed: {e}")))?;

        let text = self
            .api
            .get_utf8_text()
            .map_err(|e| OcrError::RecognitionFailed(format!("failed to read recognized text: {e}")))?;

        Ok(strip_control_characters(&text))
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Run `f` with a freshly acquired worker, releasing it on every exit path.
pub fn with_worker<T>(config: &OcrConfig, f: impl FnOnce(&OcrWorker) -> Result<T>) -> Result<T> {
    scoped(|| OcrWorker::acquire(config), f)
}

/// Acquire a resource, run `f`, and let the guard drop regardless of how
/// `f` exits. Separated from `with_worker` so the release guarantee itself
/// is testable without an engine.
fn scoped<W, T, E>(acquire: impl FnOnce() -> std::result::Result<W, E>, f: impl FnOnce(&W) -> std::result::Result<T, E>) -> std::result::Result<T, E> {
    let worker = acquire()?;
    f(&worker)
}

fn datapath_str(dir: &Path) -> Result<String> {
    dir.to_str()
        .map(str::to_string)
        .ok_or_else(|| OcrError::InvalidConfiguration(format!("tessdata path is not valid UTF-8: {}", dir.display())))
}

/// Tesseract occasionally emits stray control bytes; keep only whitespace
/// controls the text layer is allowed to contain.
fn strip_control_characters(text: &str) -> String {
    if text
        .chars()
        .any(|c| matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') && !matches!(c, '\n' | '\r' | '\t'))
    {
        text.chars()
            .filter(|c| !matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') || matches!(c, '\n' | '\r' | '\t'))
            .collect()
    } else {
        text.to_string()
    }
}
