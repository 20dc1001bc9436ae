//! JPEG encoding for print export.
//!
//! JPEG has no alpha channel. Transparent areas are flattened onto white,
//! which is what the paper looks like.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::decode::{RasterBuffer, CHANNELS};
use crate::error::CardPrepError;

/// Encode an RGBA raster to JPEG bytes.
///
/// # Arguments
///
/// * `image` - RGBA raster; alpha is composited over white
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Quality Guidelines
///
/// * 90-100: print output
/// * 60-80: previews and thumbnails
pub fn encode_jpeg(image: &RasterBuffer, quality: u8) -> Result<Vec<u8>, CardPrepError> {
    super::check_encodable(image)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let rgb = flatten_onto_white(&image.pixels);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| CardPrepError::ImageEncode(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// RGBA → RGB, blending each pixel over an opaque white background.
fn flatten_onto_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            let blended = (c as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}
