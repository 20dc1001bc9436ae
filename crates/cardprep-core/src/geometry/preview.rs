//! Mapping of print geometry into a bounded screen preview.

use serde::{Deserialize, Serialize};

use super::positioning::CardPositioning;
use super::settings::SizeIn;
use crate::SCREEN_DPI;

/// A width/height pair in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizePx {
    pub width: f64,
    pub height: f64,
}

impl SizePx {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectPx {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Screen-space geometry for the layout preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewGeometry {
    /// Page box, origin at (0, 0).
    pub page: SizePx,
    /// Card bounding box on the page.
    pub card: RectPx,
    /// Uniform factor applied after the DPI conversion (1.0 when unbounded).
    pub scale: f64,
    /// Effective screen pixels per page inch.
    pub pixels_per_inch: f64,
    pub rotation_degrees: f64,
}

impl PreviewGeometry {
    /// Convert a length in inches to preview pixels.
    #[inline]
    pub fn inches_to_px(&self, inches: f64) -> f64 {
        inches * self.pixels_per_inch
    }
}

/// Scale page and card geometry into the preview area.
///
/// The page is converted at [`SCREEN_DPI`]. If it then exceeds either bound
/// of `max_preview`, a single factor `min(maxW / w, maxH / h)` shrinks page,
/// card size and card origin together.
pub fn scale_to_preview(
    positioning: &CardPositioning,
    page_size: SizeIn,
    max_preview: SizePx,
) -> PreviewGeometry {
    let page_w = page_size.width * SCREEN_DPI;
    let page_h = page_size.height * SCREEN_DPI;

    let scale = if page_w > max_preview.width || page_h > max_preview.height {
        (max_preview.width / page_w).min(max_preview.height / page_h)
    } else {
        1.0
    };
    let ppi = SCREEN_DPI * scale;

    PreviewGeometry {
        page: SizePx::new(page_w * scale, page_h * scale),
        card: RectPx {
            x: positioning.x * ppi,
            y: positioning.y * ppi,
            width: positioning.width * ppi,
            height: positioning.height * ppi,
        },
        scale,
        pixels_per_inch: ppi,
        rotation_degrees: positioning.rotation_degrees,
    }
}
