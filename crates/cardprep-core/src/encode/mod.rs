//! Encoding of finished rasters.
//!
//! - PNG for the preview transport (lossless, keeps alpha), optionally as a
//!   base64 data URL
//! - JPEG for print export, alpha flattened onto white

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::{encode_png, encode_png_data_url};

use crate::decode::RasterBuffer;
use crate::error::CardPrepError;

/// Reject empty or malformed rasters before handing them to an encoder.
fn check_encodable(image: &RasterBuffer) -> Result<(), CardPrepError> {
    let reason = if image.is_empty() {
        "cannot encode an empty image"
    } else if !image.is_well_formed() {
        "pixel buffer does not match dimensions"
    } else {
        return Ok(());
    };
    Err(CardPrepError::InvalidImage {
        width: image.width,
        height: image.height,
        reason: reason.to_string(),
    })
}
