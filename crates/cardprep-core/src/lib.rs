//! Cardprep Core - card image preparation for print
//!
//! This crate provides the numeric core of the card print pipeline: color
//! correction, DPI-aware placement geometry, rotation-aware compositing and
//! pixel-exact calibration sampling.
//!
//! # Resolutions
//!
//! Card images arrive rasterized at [`EXTRACTION_DPI`]. Print output uses the
//! same resolution; the layout preview is laid out at [`SCREEN_DPI`] and
//! scaled down to fit.

pub mod calibration;
pub mod color;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod transform;

pub use calibration::{
    compute_pixel_perfect_crop, corrected_offset, generate_calibration_grid,
    generate_transformation_values, CalibrationGrid, CalibrationGridConfig, CalibrationOptions,
    OffsetCorrection, SelectedRegion, TransformationAxis,
};
pub use color::{
    apply_color_transformation, try_apply_color_transformation, ColorParameter,
    ColorTransformError, ColorTransformation,
};
pub use decode::{decode_image, RasterBuffer, RasterDimensions};
pub use encode::{encode_jpeg, encode_png, encode_png_data_url};
pub use error::CardPrepError;
pub use geometry::{
    compute_render_dimensions, resolve_card_positioning, scale_to_preview, CardPositioning,
    CardType, OutputSettings, PreviewGeometry, RenderDimensions, SizeIn, SizePx, SizingMode,
};
pub use pipeline::{
    render_card_for_print, render_card_preview, CardPreview, Deadline, Generation,
    GenerationTracker, PlacedCard,
};
pub use transform::{composite_card, crop_pixels, InterpolationFilter, PixelRect};

/// Resolution card images are extracted at, and print output is rendered at.
pub const EXTRACTION_DPI: f64 = 300.0;

/// Resolution of the layout preview before fitting.
pub const SCREEN_DPI: f64 = 72.0;

/// Largest accepted source image side, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 20_000;

/// Largest composited canvas side, in pixels.
pub const MAX_CANVAS_DIMENSION: u32 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poker_card_at_extraction_dpi() {
        let (w, h) = OutputSettings::default().card_size.to_pixels(EXTRACTION_DPI);
        assert_eq!((w, h), (750, 1050));
    }

    #[test]
    fn test_canvas_cap_below_image_cap() {
        assert!(MAX_CANVAS_DIMENSION < MAX_IMAGE_DIMENSION);
    }

    #[test]
    fn test_print_then_preview_agree_on_placement() {
        let image = RasterBuffer::filled(750, 1050, [0, 0, 0, 255]);
        let settings = OutputSettings::default();
        let identity = ColorTransformation::default();
        let placed = render_card_for_print(&image, &settings, CardType::Front, &identity).unwrap();
        let preview = render_card_preview(
            &image,
            &settings,
            CardType::Front,
            &identity,
            SizePx::new(2000.0, 2000.0),
        )
        .unwrap();
        assert!((preview.geometry.card.x - placed.placement.x * SCREEN_DPI).abs() < 1e-9);
    }
}
