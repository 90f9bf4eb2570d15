use thiserror::Error;

/// Errors from the OCR layer.
///
/// `InitializationFailed` and `MissingLanguageData` are fatal for the whole
/// document; `RecognitionFailed` is scoped to a single page and absorbed by
/// the page loop.
#[derive(Debug, Clone, Error)]
pub enum OcrError {
    #[error("OCR engine initialization failed: {0}")]
    InitializationFailed(String),

    #[error("missing language data: {0}")]
    MissingLanguageData(String),

    #[error("invalid OCR configuration: {0}")]
    InvalidConfiguration(String),

    #[error("image processing failed: {0}")]
    ImageProcessingFailed(String),

    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
}

pub type Result<T> = std::result::Result<T, OcrError>;
