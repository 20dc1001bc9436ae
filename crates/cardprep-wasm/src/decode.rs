//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@cardprep/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use cardprep_core::pipeline;
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsRasterBuffer;

/// Decode a PNG or JPEG image from bytes into an RGBA raster.
///
/// # Errors
///
/// Returns an error if the format is not recognized, the data is corrupted,
/// or decoding ran past its 10 s budget.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterBuffer, JsValue> {
    pipeline::decode_card_image(bytes)
        .map(JsRasterBuffer::from_raster)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardprep_core::decode::RasterBuffer;
    use cardprep_core::encode;

    #[test]
    fn test_decode_png() {
        let source = RasterBuffer::filled(6, 4, [9, 8, 7, 255]);
        let bytes = encode::encode_png(&source).unwrap();
        let image = decode_image(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (6, 4));
        assert_eq!(image.byte_length(), 6 * 4 * 4);
    }
}
