//! Page rasterization via Pdfium.

use image::DynamicImage;
use pdfium_render::prelude::*;

use super::error::{PdfError, Result};
use crate::config::RenderOptions;
use crate::types::PageImage;

/// Renders single PDF pages into bitmaps.
///
/// The document is reloaded per call; Pdfium parses lazily, so this keeps
/// memory proportional to one page rather than the whole document.
pub struct PdfRasterizer {
    pdfium: Pdfium,
}

impl PdfRasterizer {
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| PdfError::LibraryLoadFailed(format!("failed to bind Pdfium: {e}")))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize> {
        let document = self.load(pdf_bytes)?;
        Ok(document.pages().len() as usize)
    }

    /// Render one zero-based page at the configured scale.
    ///
    /// `page_index` must be below [`Self::page_count`]; out-of-range is a
    /// caller bug and reported as [`PdfError::PageNotFound`].
    pub fn render_page(&self, pdf_bytes: &[u8], page_index: usize, options: &RenderOptions) -> Result<PageImage> {
        let document = self.load(pdf_bytes)?;
        let page = document
            .pages()
            .get(page_index as u16)
            .map_err(|_| PdfError::PageNotFound(page_index))?;

        let width_points = page.width().value;
        let height_points = page.height().value;
        let scale = effective_scale(width_points, height_points, options);

        let config = PdfRenderConfig::new()
            .set_target_width(((width_points * scale) as i32).max(1))
            .set_target_height(((height_points * scale) as i32).max(1))
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderingFailed(format!("failed to render page {page_index}: {e}")))?;

        let image = bitmap.as_image().into_rgb8();
        Ok(PageImage::new(DynamicImage::ImageRgb8(image)))
    }

    fn load<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<PdfDocument<'a>> {
        self.pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| PdfError::InvalidPdf(e.to_string()))
    }
}

/// Scale multiplier after clamping so neither output edge exceeds
/// `max_dimension`.
fn effective_scale(width_points: f32, height_points: f32, options: &RenderOptions) -> f32 {
    let scale = options.scale.max(0.1);
    let longest = width_points.max(height_points).max(1.0);
    let limit = options.max_dimension as f32;

    if longest * scale <= limit { scale } else { limit / longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(scale: f32, max_dimension: u32) -> RenderOptions {
        RenderOptions { scale, max_dimension }
    }

    #[test]
    fn test_effective_scale_within_limit() {
        let scale = effective_scale(595.0, 842.0, &options(2.0, 8192));
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn test_effective_scale_clamped_for_huge_page() {
        let scale = effective_scale(10_000.0, 10_000.0, &options(2.0, 8192));
        assert!(scale < 2.0);
        assert!((10_000.0 * scale) <= 8192.0 + 1.0);
    }

    #[test]
    fn test_effective_scale_floors_nonpositive_scale() {
        let scale = effective_scale(595.0, 842.0, &options(0.0, 8192));
        assert!(scale > 0.0);
    }

    #[test]
    fn test_effective_scale_degenerate_page() {
        let scale = effective_scale(0.0, 0.0, &options(2.0, 8192));
        assert!(scale.is_finite());
        assert!(scale > 0.0);
    }
}
