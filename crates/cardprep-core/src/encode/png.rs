//! PNG encoding and data URLs for the preview transport.
//!
//! PNG keeps the alpha channel, so transparent letterbox areas around a
//! composited card survive the round trip to the browser.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::decode::RasterBuffer;
use crate::error::CardPrepError;

/// Encode an RGBA raster as PNG bytes.
pub fn encode_png(image: &RasterBuffer) -> Result<Vec<u8>, CardPrepError> {
    super::check_encodable(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&image.pixels, image.width, image.height, ExtendedColorType::Rgba8)
        .map_err(|e| CardPrepError::ImageEncode(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode an RGBA raster as a `data:image/png;base64,...` URL.
pub fn encode_png_data_url(image: &RasterBuffer) -> Result<String, CardPrepError> {
    let png = encode_png(image)?;
    let b64 = STANDARD.encode(&png);
    debug!("Encoded preview → {} bytes base64", b64.len());
    Ok(format!("data:image/png;base64,{}", b64))
}
