//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core cardprep
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use cardprep_core::decode::RasterBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. The layout matches `ImageData.data`, so
/// the copy can go straight into `new ImageData(...)`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsRasterBuffer {
    inner: RasterBuffer,
}

#[wasm_bindgen]
impl JsRasterBuffer {
    /// Create a raster from dimensions and RGBA pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterBuffer, JsValue> {
        Self::try_new(width, height, pixels).map_err(|e| JsValue::from_str(&e))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterBuffer {
    /// Validating constructor with a plain error, usable off the wasm target.
    pub(crate) fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        RasterBuffer::try_new(width, height, pixels)
            .map(|inner| Self { inner })
            .map_err(|e| e.to_string())
    }

    pub(crate) fn from_raster(raster: RasterBuffer) -> Self {
        Self { inner: raster }
    }

    pub(crate) fn raster(&self) -> &RasterBuffer {
        &self.inner
    }
}
