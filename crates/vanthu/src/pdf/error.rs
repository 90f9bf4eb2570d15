use thiserror::Error;

/// Errors from the PDF layer.
#[derive(Debug, Clone, Error)]
pub enum PdfError {
    #[error("invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("page {0} not found")]
    PageNotFound(usize),

    #[error("rendering failed: {0}")]
    RenderingFailed(String),

    #[error("text extraction failed: {0}")]
    TextExtractionFailed(String),

    #[error("PDF library unavailable: {0}")]
    LibraryLoadFailed(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;
