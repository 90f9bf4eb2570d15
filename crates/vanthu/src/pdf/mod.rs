//! PDF structure access: direct text extraction and page rasterization.

pub mod error;
pub mod rendering;
pub mod text;

pub use error::PdfError;
pub use rendering::PdfRasterizer;
