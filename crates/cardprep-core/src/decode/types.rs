//! Core raster types.

use serde::{Deserialize, Serialize};

use crate::error::CardPrepError;

/// Bytes per pixel in a [`RasterBuffer`] (RGBA).
pub const CHANNELS: usize = 4;

/// Pixel dimensions of a raster, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RasterDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An RGBA image in row-major order, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data. Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a new RasterBuffer with the given dimensions and pixel data.
    ///
    /// `pixels` must hold exactly `width * height * 4` bytes; this is only
    /// checked in debug builds, and [`RasterBuffer::pixel`] panics on a short
    /// buffer. Use [`RasterBuffer::try_new`] for data from outside the crate.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterBuffer, rejecting pixel data whose length does not
    /// match the dimensions.
    pub fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CardPrepError> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(CardPrepError::InvalidImage {
                width,
                height,
                reason: format!(
                    "expected {} bytes (width * height * 4), got {}",
                    expected,
                    pixels.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for encoding.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn dimensions(&self) -> RasterDimensions {
        RasterDimensions::new(self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the pixel data length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.pixel_count() * CHANNELS
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Read one pixel. Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}
