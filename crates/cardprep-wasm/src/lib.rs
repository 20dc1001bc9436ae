//! Cardprep WASM - WebAssembly bindings for cardprep
//!
//! This crate provides WASM bindings to expose the cardprep-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `color` - Color transformation parameters and the color engine
//! - `layout` - Render geometry, page placement and preview scaling
//! - `render` - End-to-end card rendering for print and preview
//! - `calibration` - Region picking, pixel-perfect crops and calibration grids
//! - `generation` - Generation tokens for discarding superseded results
//! - `decode` / `encode` - Image decoding and PNG/JPEG encoding
//! - `logging` - Forwards core warnings to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, compute_card_layout } from '@cardprep/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const layout = compute_card_layout(image.width, image.height, settings, 'front', 600, 800);
//! ```
//!
//! Decoding and card rendering run under the core's default time budgets
//! (10 s decode, 15 s per card or calibration cell).

use cardprep_core::CardPrepError;
use wasm_bindgen::prelude::*;

mod calibration;
mod color;
mod decode;
mod encode;
mod generation;
mod layout;
mod logging;
mod render;
mod types;

// Re-export public types
pub use calibration::{
    corrected_offset, generate_calibration_grid, pixel_perfect_crop, region_preview_rect,
    resize_region_for_grid, select_region, JsCalibrationGrid,
};
pub use color::{apply_color_transformation, JsColorTransformation};
pub use decode::decode_image;
pub use encode::{encode_jpeg, encode_png, encode_png_data_url};
pub use generation::JsGenerationTracker;
pub use layout::compute_card_layout;
pub use render::{render_card, render_card_preview, JsPlacedCard};
pub use types::JsRasterBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert a core error into a JavaScript error value.
pub(crate) fn to_js_error(err: CardPrepError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Log a non-fatal degradation to the browser console.
#[cfg(target_arch = "wasm32")]
pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn console_warn(_message: &str) {}
