//! Whole-image resampling through the `image` crate.
//!
//! Used for screen previews, for shrinking oversized sources before
//! compositing and for the compositor's unrotated fallback.

use super::InterpolationFilter;
use crate::decode::RasterBuffer;
use crate::error::CardPrepError;

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns [`CardPrepError::InvalidImage`] for zero target dimensions or a
/// malformed source buffer.
pub fn resize(
    image: &RasterBuffer,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
) -> Result<RasterBuffer, CardPrepError> {
    if width == 0 || height == 0 {
        return Err(CardPrepError::InvalidImage {
            width,
            height,
            reason: "resize target must be non-zero".to_string(),
        });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image().ok_or_else(|| CardPrepError::InvalidImage {
        width: image.width,
        height: image.height,
        reason: "pixel buffer does not match dimensions".to_string(),
    })?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());
    Ok(RasterBuffer::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_exact() {
        let img = RasterBuffer::filled(10, 20, [50, 60, 70, 255]);
        let out = resize(&img, 5, 10, InterpolationFilter::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (5, 10));
        // Uniform image stays uniform
        assert_eq!(out.pixel(2, 5), [50, 60, 70, 255]);
    }

    #[test]
    fn test_resize_same_size_clones() {
        let img = RasterBuffer::filled(4, 4, [1, 2, 3, 4]);
        assert_eq!(resize(&img, 4, 4, InterpolationFilter::Lanczos3).unwrap(), img);
    }

    #[test]
    fn test_resize_zero_rejected() {
        let img = RasterBuffer::filled(4, 4, [1, 2, 3, 4]);
        assert!(resize(&img, 0, 4, InterpolationFilter::Nearest).is_err());
    }
}
