//! Card container and image render size computation.
//!
//! # Algorithm
//!
//! 1. Source pixels → inches at the extraction DPI
//! 2. `target = card + 2 * bleed`
//! 3. `container = target * scale`
//! 4. Image size by sizing mode, comparing aspect ratios against the
//!    *unscaled* target
//! 5. `image *= scale`

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::settings::{OutputSettings, SizeIn, SizingMode};
use crate::decode::RasterDimensions;
use crate::error::CardPrepError;
use crate::{EXTRACTION_DPI, MAX_IMAGE_DIMENSION};

/// Computed render geometry for one (source image, settings) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDimensions {
    /// Card container size (bleed and scale included).
    pub card: SizeIn,
    /// Size the image is drawn at inside the container.
    pub image: SizeIn,
    /// Extracted image size at the extraction DPI.
    pub original: SizeIn,
    pub sizing_mode: SizingMode,
}

/// Validate source pixel dimensions.
pub fn validate_image_dimensions(image: RasterDimensions) -> Result<(), CardPrepError> {
    let reason = if image.width == 0 || image.height == 0 {
        "dimensions must be non-zero".to_string()
    } else if image.width > MAX_IMAGE_DIMENSION || image.height > MAX_IMAGE_DIMENSION {
        format!("exceeds {} px per side", MAX_IMAGE_DIMENSION)
    } else {
        return Ok(());
    };
    Err(CardPrepError::InvalidImage {
        width: image.width,
        height: image.height,
        reason,
    })
}

/// Compute container and image render sizes.
///
/// # Errors
///
/// * [`CardPrepError::InvalidImage`] for zero or oversized pixel dimensions
/// * [`CardPrepError::InvalidSettings`] for out-of-range settings
pub fn compute_render_dimensions(
    image: RasterDimensions,
    settings: &OutputSettings,
) -> Result<RenderDimensions, CardPrepError> {
    validate_image_dimensions(image)?;
    settings.validate()?;

    let original = SizeIn::new(
        image.width as f64 / EXTRACTION_DPI,
        image.height as f64 / EXTRACTION_DPI,
    );
    let target = settings.target_size();
    let scale = settings.scale_factor();

    let card = target.scaled(scale);
    let image_size = match settings.sizing_mode {
        SizingMode::ActualSize => original,
        SizingMode::FitToCard => fit_inside(original, target),
        SizingMode::FillCard => cover(original, target),
    }
    .scaled(scale);

    debug!(
        mode = %settings.sizing_mode,
        card_w = card.width,
        card_h = card.height,
        image_w = image_size.width,
        image_h = image_size.height,
        "computed render dimensions"
    );

    Ok(RenderDimensions {
        card,
        image: image_size,
        original,
        sizing_mode: settings.sizing_mode,
    })
}

/// Largest size with the image's aspect ratio that fits inside `target`.
fn fit_inside(image: SizeIn, target: SizeIn) -> SizeIn {
    let image_aspect = image.aspect_ratio();
    if image_aspect > target.aspect_ratio() {
        // Relatively wider: pin width
        SizeIn::new(target.width, target.width / image_aspect)
    } else {
        SizeIn::new(target.height * image_aspect, target.height)
    }
}

/// Smallest size with the image's aspect ratio that covers `target`.
fn cover(image: SizeIn, target: SizeIn) -> SizeIn {
    let image_aspect = image.aspect_ratio();
    if image_aspect > target.aspect_ratio() {
        // Relatively wider: pin height, crop width
        SizeIn::new(target.height * image_aspect, target.height)
    } else {
        SizeIn::new(target.width, target.width / image_aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn settings(mode: SizingMode) -> OutputSettings {
        OutputSettings {
            sizing_mode: mode,
            ..OutputSettings::default()
        }
    }

    #[test]
    fn test_actual_size_keeps_extracted_inches() {
        let dims =
            compute_render_dimensions(RasterDimensions::new(600, 900), &settings(SizingMode::ActualSize))
                .unwrap();
        assert!((dims.image.width - 2.0).abs() < EPS);
        assert!((dims.image.height - 3.0).abs() < EPS);
        assert_eq!(dims.original, dims.image);
        assert_eq!(dims.card, SizeIn::new(2.5, 3.5));
    }

    #[test]
    fn test_fit_wide_image_pins_width() {
        // 2:1 image into a 2.5x3.5 card
        let dims =
            compute_render_dimensions(RasterDimensions::new(1000, 500), &settings(SizingMode::FitToCard))
                .unwrap();
        assert!((dims.image.width - 2.5).abs() < EPS);
        assert!((dims.image.height - 1.25).abs() < EPS);
    }

    #[test]
    fn test_fill_wide_image_pins_height() {
        let dims =
            compute_render_dimensions(RasterDimensions::new(1000, 500), &settings(SizingMode::FillCard))
                .unwrap();
        assert!((dims.image.height - 3.5).abs() < EPS);
        assert!((dims.image.width - 7.0).abs() < EPS);
    }

    #[test]
    fn test_bleed_and_scale() {
        let s = OutputSettings {
            bleed_in: 0.25,
            scale_percent: 200.0,
            sizing_mode: SizingMode::ActualSize,
            ..OutputSettings::default()
        };
        let dims = compute_render_dimensions(RasterDimensions::new(300, 300), &s).unwrap();
        assert!((dims.card.width - 6.0).abs() < EPS);
        assert!((dims.card.height - 8.0).abs() < EPS);
        // Scale applies to the image too, even in actual-size mode
        assert!((dims.image.width - 2.0).abs() < EPS);
        assert!((dims.original.width - 1.0).abs() < EPS);
    }

    #[test]
    fn test_aspect_compared_against_unscaled_target() {
        let s = OutputSettings {
            bleed_in: 0.5,
            scale_percent: 50.0,
            sizing_mode: SizingMode::FitToCard,
            ..OutputSettings::default()
        };
        // Target 3.5x4.5, same aspect as the image
        let dims = compute_render_dimensions(RasterDimensions::new(700, 900), &s).unwrap();
        assert!((dims.image.width - 1.75).abs() < EPS);
        assert!((dims.image.height - 2.25).abs() < EPS);
        assert!((dims.card.width - 1.75).abs() < EPS);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = compute_render_dimensions(RasterDimensions::new(0, 100), &OutputSettings::default())
            .unwrap_err();
        assert!(matches!(err, CardPrepError::InvalidImage { width: 0, .. }));
    }

    #[test]
    fn test_oversized_rejected() {
        let err =
            compute_render_dimensions(RasterDimensions::new(100, 20_001), &OutputSettings::default())
                .unwrap_err();
        assert!(matches!(err, CardPrepError::InvalidImage { height: 20_001, .. }));
        assert!(compute_render_dimensions(
            RasterDimensions::new(20_000, 20_000),
            &OutputSettings::default()
        )
        .is_ok());
    }

    #[test]
    fn test_invalid_settings_propagate() {
        let s = OutputSettings {
            scale_percent: -5.0,
            ..OutputSettings::default()
        };
        assert!(matches!(
            compute_render_dimensions(RasterDimensions::new(10, 10), &s),
            Err(CardPrepError::InvalidSettings { .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const TOL: f64 = 1e-9;

    fn settings_strategy(mode: SizingMode) -> impl Strategy<Value = OutputSettings> {
        (0.5f64..=10.0, 0.5f64..=10.0, 0.0f64..=2.0, 1.0f64..=500.0).prop_map(
            move |(w, h, bleed, scale)| OutputSettings {
                card_size: SizeIn::new(w, h),
                bleed_in: bleed,
                scale_percent: scale,
                sizing_mode: mode,
                ..OutputSettings::default()
            },
        )
    }

    fn image_strategy() -> impl Strategy<Value = RasterDimensions> {
        (1u32..=20_000, 1u32..=20_000).prop_map(|(w, h)| RasterDimensions::new(w, h))
    }

    proptest! {
        /// Property: fit-to-card stays inside the container and touches one edge.
        #[test]
        fn prop_fit_inside_container(
            image in image_strategy(),
            s in settings_strategy(SizingMode::FitToCard),
        ) {
            let d = compute_render_dimensions(image, &s).unwrap();
            let tol_w = d.card.width * TOL;
            let tol_h = d.card.height * TOL;
            prop_assert!(d.image.width <= d.card.width + tol_w);
            prop_assert!(d.image.height <= d.card.height + tol_h);
            prop_assert!(
                (d.image.width - d.card.width).abs() <= tol_w
                    || (d.image.height - d.card.height).abs() <= tol_h
            );
        }

        /// Property: fill-card covers the container and touches one edge.
        #[test]
        fn prop_fill_covers_container(
            image in image_strategy(),
            s in settings_strategy(SizingMode::FillCard),
        ) {
            let d = compute_render_dimensions(image, &s).unwrap();
            let tol_w = d.card.width * TOL;
            let tol_h = d.card.height * TOL;
            prop_assert!(d.image.width + tol_w >= d.card.width);
            prop_assert!(d.image.height + tol_h >= d.card.height);
            prop_assert!(
                (d.image.width - d.card.width).abs() <= tol_w
                    || (d.image.height - d.card.height).abs() <= tol_h
            );
        }

        /// Property: sizing preserves the image aspect ratio.
        #[test]
        fn prop_aspect_preserved(
            image in image_strategy(),
            s in settings_strategy(SizingMode::FillCard),
        ) {
            let d = compute_render_dimensions(image, &s).unwrap();
            let expected = image.width as f64 / image.height as f64;
            let actual = d.image.width / d.image.height;
            prop_assert!((actual - expected).abs() <= expected * 1e-9);
        }
    }
}
