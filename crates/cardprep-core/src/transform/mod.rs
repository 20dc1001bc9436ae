//! Raster transforms: card compositing, exact pixel crops and resampling.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in source pixels, origin at the top-left corner
//! - Composited output is at print resolution ([`crate::EXTRACTION_DPI`])

mod composite;
mod crop;
mod resize;

pub use composite::composite_card;
pub use crop::{crop_pixels, PixelRect};
pub use resize::resize;

use serde::{Deserialize, Serialize};

/// Interpolation filter for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest neighbor: fastest, blocky on upscale.
    Nearest,
    /// Bilinear: good balance, used for previews.
    #[default]
    Bilinear,
    /// Lanczos3: highest quality, used for print output.
    Lanczos3,
}

impl InterpolationFilter {
    /// The matching `image` crate filter.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            InterpolationFilter::Nearest => image::imageops::FilterType::Nearest,
            InterpolationFilter::Bilinear => image::imageops::FilterType::Triangle,
            InterpolationFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(InterpolationFilter::default(), InterpolationFilter::Bilinear);
    }
}
