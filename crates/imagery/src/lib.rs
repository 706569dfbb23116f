//! Image normalization for the preprocessing stage.
//!
//! One operation lives here: take raw image bytes in whatever format
//! they arrived in, resize them to a fixed target, and hand back PNG
//! bytes ready for upload. Decoding and encoding stay behind this crate
//! so the pipeline never touches codec details.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Content type attached to every uploaded result.
pub const CONTENT_TYPE_PNG: &str = "image/png";

/// Errors from decoding, resizing, or re-encoding an image.
///
/// A `Decode` failure means the input bytes were not a usable image.
/// Callers treat that as a skippable input rather than a pipeline
/// failure.
#[derive(Debug, Error)]
pub enum ImageryError {
    /// Target width or height is zero
    #[error("Target dimensions {width}x{height} are not usable")]
    BadDimensions { width: u32, height: u32 },

    /// Reading the input while sniffing its format failed
    #[error("Failed to probe image format: {0}")]
    Probe(#[from] std::io::Error),

    /// Input bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// PNG encoding of the resized image failed
    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Resize raw image bytes to exactly `width` x `height` and encode the
/// result as PNG.
///
/// The input format is sniffed from the bytes, so PNG, JPEG, and
/// anything else the `image` crate decodes are accepted. Pixels are
/// normalized to 8-bit RGB and the target size is applied without
/// preserving aspect ratio. Bilinear filtering keeps parity with how
/// the raw frames were downsampled upstream.
pub fn resize_to_png(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageryError> {
    if width == 0 || height == 0 {
        return Err(ImageryError::BadDimensions { width, height });
    }

    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(ImageryError::Decode)?;

    let resized =
        image::imageops::resize(&decoded.into_rgb8(), width, height, FilterType::Triangle);

    let mut encoded = Vec::new();
    DynamicImage::ImageRgb8(resized)
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(ImageryError::Encode)?;
    Ok(encoded)
}
