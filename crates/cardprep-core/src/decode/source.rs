//! Decoding of extracted card images.

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

use super::RasterBuffer;
use crate::error::CardPrepError;

/// Decode an encoded image (PNG or JPEG) into an RGBA raster.
///
/// The format is sniffed from the bytes. Grayscale and RGB sources are
/// expanded to RGBA with an opaque alpha channel.
///
/// # Errors
///
/// Returns [`CardPrepError::ImageDecode`] if the format is not recognized or
/// the data is corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, CardPrepError> {
    if bytes.is_empty() {
        return Err(CardPrepError::ImageDecode("empty input".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CardPrepError::ImageDecode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| CardPrepError::ImageDecode(e.to_string()))?;

    let raster = RasterBuffer::from_rgba_image(img.into_rgba8());
    debug!(
        width = raster.width,
        height = raster.height,
        "decoded source image"
    );
    Ok(raster)
}
