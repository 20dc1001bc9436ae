//! Exact pixel cropping.
//!
//! Unlike a normalized crop, the rectangle here is in source pixels and no
//! rounding happens: the output contains exactly the requested pixels, clamped
//! to the image bounds. Calibration crops depend on this to stay free of
//! resampling artifacts.

use serde::{Deserialize, Serialize};

use crate::decode::{RasterBuffer, CHANNELS};

/// A rectangle in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp this rectangle to an image of the given size.
    ///
    /// The origin is pulled inside the image and the size trimmed to what
    /// remains, never below 1x1.
    pub fn clamped_to(&self, width: u32, height: u32) -> PixelRect {
        let x = self.x.min(width.saturating_sub(1));
        let y = self.y.min(height.saturating_sub(1));
        let right = x.saturating_add(self.width).min(width);
        let bottom = y.saturating_add(self.height).min(height);
        PixelRect {
            x,
            y,
            width: right.saturating_sub(x).max(1),
            height: bottom.saturating_sub(y).max(1),
        }
    }
}

/// Copy a rectangle of pixels out of an image.
///
/// # Behavior
///
/// - The rectangle is clamped to the image bounds
/// - Minimum output dimension is 1x1 pixels
/// - A rectangle covering the whole image returns a copy of it
pub fn crop_pixels(image: &RasterBuffer, rect: PixelRect) -> RasterBuffer {
    let rect = rect.clamped_to(image.width, image.height);

    // Fast path: full crop returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return image.clone();
    }

    let row_bytes = rect.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.y..rect.y + rect.height {
        let start = (y as usize * image.width as usize + rect.x as usize) * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    RasterBuffer {
        width: rect.width,
        height: rect.height,
        pixels: output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RasterBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(20, 10);
        let result = crop_pixels(&img, PixelRect::new(0, 0, 20, 10));
        assert_eq!(result, img);
    }

    #[test]
    fn test_exact_region() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, PixelRect::new(2, 3, 4, 5));
        assert_eq!((result.width, result.height), (4, 5));
        // First pixel should be from (2, 3): 3 * 10 + 2 = 32
        assert_eq!(result.pixel(0, 0), [32, 32, 32, 255]);
        // Last pixel from (5, 7): 75
        assert_eq!(result.pixel(3, 4), [75, 75, 75, 255]);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, PixelRect::new(8, 8, 5, 5));
        assert_eq!((result.width, result.height), (2, 2));
    }

    #[test]
    fn test_crop_origin_outside() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, PixelRect::new(50, 50, 5, 5));
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixel(0, 0)[0], 99);
    }

    #[test]
    fn test_zero_size_becomes_one_pixel() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, PixelRect::new(4, 4, 0, 0));
        assert_eq!((result.width, result.height), (1, 1));
    }

    #[test]
    fn test_alpha_copied() {
        let img = RasterBuffer::new(2, 1, vec![1, 2, 3, 40, 5, 6, 7, 80]);
        let result = crop_pixels(&img, PixelRect::new(1, 0, 1, 1));
        assert_eq!(result.pixels, vec![5, 6, 7, 80]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
