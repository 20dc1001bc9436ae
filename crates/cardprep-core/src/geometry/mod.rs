//! DPI-aware print geometry.
//!
//! Three resolutions meet here:
//! - the extraction DPI ([`crate::EXTRACTION_DPI`]) at which card images were rasterized,
//! - the print resolution, also 300 DPI, used for composited output,
//! - the screen DPI ([`crate::SCREEN_DPI`]) used for the layout preview.
//!
//! All page-space values are inches with the origin at the page's top-left
//! corner. Pixel values only appear in [`preview`] and in the compositor.
//!
//! # Pipeline
//!
//! [`compute_render_dimensions`] → [`resolve_card_positioning`] →
//! compositor → [`scale_to_preview`] (screen) or document assembly (print).

mod positioning;
mod preview;
mod render;
mod settings;

pub use positioning::{resolve_card_positioning, CardPositioning};
pub use preview::{scale_to_preview, PreviewGeometry, RectPx, SizePx};
pub use render::{compute_render_dimensions, validate_image_dimensions, RenderDimensions};
pub use settings::{
    CardOffset, CardRotation, CardType, OutputSettings, SizeIn, SizingMode, MAX_BLEED_IN,
    MAX_SCALE_PERCENT,
};

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// True for rotations within 0.001° of 90° or 270°.
pub fn swaps_dimensions(degrees: f64) -> bool {
    let angle = normalize_degrees(degrees);
    (angle - 90.0).abs() < 0.001 || (angle - 270.0).abs() < 0.001
}
