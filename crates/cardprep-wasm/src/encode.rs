//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Lossless PNG bytes, alpha kept
//! - [`encode_png_data_url`] - PNG as a `data:` URL for `<img src>`
//! - [`encode_jpeg`] - JPEG bytes for print export, alpha flattened onto white
//!
//! # Example
//!
//! ```typescript
//! img.src = encode_png_data_url(preview);
//! const jpegBytes = encode_jpeg(card, 95);
//! ```

use cardprep_core::encode;
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsRasterBuffer;

/// Encode a raster to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsRasterBuffer) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.raster()).map_err(to_js_error)
}

/// Encode a raster as a base64 PNG data URL.
#[wasm_bindgen]
pub fn encode_png_data_url(image: &JsRasterBuffer) -> Result<String, JsValue> {
    encode::encode_png_data_url(image.raster()).map_err(to_js_error)
}

/// Encode a raster to JPEG bytes.
///
/// # Arguments
///
/// * `image` - The raster to encode
/// * `quality` - JPEG quality (1-100, recommended: 90+ for print)
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsRasterBuffer, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.raster(), quality).map_err(to_js_error)
}
