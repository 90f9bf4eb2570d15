//! Page-image normalization ahead of recognition.
//!
//! Scanned government paperwork arrives with uneven exposure and soft edges;
//! recognition accuracy improves measurably after grayscale conversion,
//! levels normalization and a light sharpen. The order is fixed: stretching
//! contrast after sharpening would amplify the noise the sharpen introduces.

use image::{DynamicImage, GrayImage, imageops};

use crate::types::PageImage;

const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Normalize a rendered page for OCR: grayscale, then levels stretch, then
/// a 3x3 sharpen. Pure function over the page bitmap.
pub fn normalize(page: PageImage) -> PageImage {
    let gray = page.image.to_luma8();
    let stretched = stretch_levels(gray);
    let sharpened = imageops::filter3x3(&stretched, &SHARPEN_KERNEL);
    PageImage::new(DynamicImage::ImageLuma8(sharpened))
}

/// Remap pixel values so the darkest becomes 0 and the brightest 255.
fn stretch_levels(mut image: GrayImage) -> GrayImage {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for pixel in image.pixels() {
        let value = pixel.0[0];
        min = min.min(value);
        max = max.max(value);
    }

    if min >= max || (min == 0 && max == u8::MAX) {
        return image;
    }

    let range = f32::from(max - min);
    for pixel in image.pixels_mut() {
        let value = f32::from(pixel.0[0] - min);
        pixel.0[0] = ((value / range) * 255.0).round() as u8;
    }
    image
}
