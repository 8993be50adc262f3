//! Image encoding and thumbnail generation.
//!
//! The core treats thumbnailing as an external collaborator with a
//! trivial contract: image bytes in, resized JPEG bytes out, aspect
//! ratio preserved. [`JpegThumbnailer`] is the default implementation,
//! built on the `image` crate.

use thiserror::Error;

/// Errors from encoding or thumbnailing an image.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

/// Collaborator that produces a thumbnail from source image bytes.
pub trait ThumbnailGenerator: Send + Sync {
    /// Resize to `target_width` preserving aspect ratio and re-encode.
    fn thumbnail(&self, image: &[u8], target_width: u32) -> Result<Vec<u8>, ThumbnailError>;
}

/// JPEG thumbnailer at fixed quality.
#[derive(Debug, Clone, Copy)]
pub struct JpegThumbnailer {
    quality: u8,
}

impl JpegThumbnailer {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl Default for JpegThumbnailer {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl ThumbnailGenerator for JpegThumbnailer {
    fn thumbnail(&self, image: &[u8], target_width: u32) -> Result<Vec<u8>, ThumbnailError> {
        let img = image::load_from_memory(image)
            .map_err(|e| ThumbnailError::Decode(e.to_string()))?;

        // Bring height down by the same factor as width so the aspect
        // ratio is preserved.
        let (width, height) = scaled_dimensions(img.width(), img.height(), target_width);
        let resized = img.resize_exact(width, height, image::imageops::FilterType::Triangle);

        encode_jpeg_image(&resized, self.quality)
    }
}

/// Re-encode source image bytes as JPEG at the given quality.
///
/// Used by ingest for the full-size image; the thumbnail goes through
/// [`ThumbnailGenerator`] instead.
pub fn encode_jpeg(image: &[u8], quality: u8) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(image)
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    encode_jpeg_image(&img, quality)
}

fn encode_jpeg_image(img: &image::DynamicImage, quality: u8) -> Result<Vec<u8>, ThumbnailError> {
    let rgb = img.to_rgb8();

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

    Ok(jpeg_bytes)
}

/// Scale (width, height) so that width becomes `target_width`.
fn scaled_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (target_width.max(1), 1);
    }

    let scale = target_width as f64 / width as f64;
    let scaled_height = ((height as f64) * scale).round() as u32;

    (target_width.max(1), scaled_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A small solid-color PNG for decode/encode tests.
    fn test_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_scaled_dimensions_preserve_aspect() {
        assert_eq!(scaled_dimensions(400, 300, 200), (200, 150));
        assert_eq!(scaled_dimensions(300, 400, 150), (150, 200));
        // Tiny images still get at least one pixel
        assert_eq!(scaled_dimensions(1000, 2, 100), (100, 1));
    }

    #[test]
    fn test_thumbnail_resizes_to_target_width() {
        let src = test_png(400, 300);
        let thumb = JpegThumbnailer::default().thumbnail(&src, 200).unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.width(), 200);
        assert_eq!(decoded.height(), 150);
    }

    #[test]
    fn test_thumbnail_rejects_garbage() {
        let result = JpegThumbnailer::default().thumbnail(b"not an image", 200);
        assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    }

    #[test]
    fn test_encode_jpeg_roundtrip() {
        let src = test_png(20, 10);
        let jpeg = encode_jpeg(&src, 80).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 10);
    }
}
