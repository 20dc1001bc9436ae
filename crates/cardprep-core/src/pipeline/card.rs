//! End-to-end card rendering for print and for the layout preview.
//!
//! Both paths run the same chain:
//!
//! ```text
//! compute_render_dimensions → resolve_card_positioning
//!   → apply_color_transformation → composite_card
//! ```
//!
//! Print stops there and hands the raster plus its page placement to the
//! document assembler. Preview continues with [`scale_to_preview`], shrinks
//! the composited card to its preview box and encodes it as a data URL.

use serde::Serialize;
use tracing::debug;

use super::deadline::Deadline;
use crate::color::{apply_color_transformation, ColorTransformation};
use crate::decode::{decode_image, RasterBuffer};
use crate::encode::encode_png_data_url;
use crate::error::CardPrepError;
use crate::geometry::{
    compute_render_dimensions, resolve_card_positioning, scale_to_preview, CardPositioning,
    CardType, OutputSettings, PreviewGeometry, RenderDimensions, SizePx,
};
use crate::transform::{composite_card, resize, InterpolationFilter};

/// A composited card and where it goes on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCard {
    /// Card container at print resolution, rotation applied.
    pub image: RasterBuffer,
    pub placement: CardPositioning,
    pub dimensions: RenderDimensions,
}

/// A card rendered for the layout preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub geometry: PreviewGeometry,
    #[serde(skip)]
    pub image: RasterBuffer,
    /// `data:image/png;base64,...` of `image`.
    pub data_url: String,
}

/// Decode a source image within [`DECODE_BUDGET`](super::DECODE_BUDGET).
pub fn decode_card_image(bytes: &[u8]) -> Result<RasterBuffer, CardPrepError> {
    decode_card_image_within(bytes, Deadline::for_decode())
}

/// Decode a source image against an explicit deadline.
pub fn decode_card_image_within(
    bytes: &[u8],
    deadline: Deadline,
) -> Result<RasterBuffer, CardPrepError> {
    let raster = decode_image(bytes)?;
    deadline.check("decode")?;
    Ok(raster)
}

/// Render one card at print resolution within
/// [`CARD_BUDGET`](super::CARD_BUDGET).
///
/// Color failures degrade to the uncorrected image (logged); geometry and
/// compositing failures are returned.
pub fn render_card_for_print(
    image: &RasterBuffer,
    settings: &OutputSettings,
    card_type: CardType,
    transformation: &ColorTransformation,
) -> Result<PlacedCard, CardPrepError> {
    render_card_for_print_within(image, settings, card_type, transformation, Deadline::for_card())
}

/// [`render_card_for_print`] against an explicit deadline.
pub fn render_card_for_print_within(
    image: &RasterBuffer,
    settings: &OutputSettings,
    card_type: CardType,
    transformation: &ColorTransformation,
    deadline: Deadline,
) -> Result<PlacedCard, CardPrepError> {
    let (corrected, dimensions, placement) =
        render_stages(image, settings, card_type, transformation, &deadline)?;

    let composited = composite_card(
        &corrected,
        &dimensions,
        placement.rotation_degrees,
        InterpolationFilter::Lanczos3,
    )?;
    deadline.check("composite")?;

    Ok(PlacedCard {
        image: composited,
        placement,
        dimensions,
    })
}

/// Render one card for the on-screen layout preview within
/// [`CARD_BUDGET`](super::CARD_BUDGET).
///
/// The composited card is resized to its box in `max_preview` space and
/// encoded as a PNG data URL.
pub fn render_card_preview(
    image: &RasterBuffer,
    settings: &OutputSettings,
    card_type: CardType,
    transformation: &ColorTransformation,
    max_preview: SizePx,
) -> Result<CardPreview, CardPrepError> {
    render_card_preview_within(
        image,
        settings,
        card_type,
        transformation,
        max_preview,
        Deadline::for_card(),
    )
}

/// [`render_card_preview`] against an explicit deadline.
pub fn render_card_preview_within(
    image: &RasterBuffer,
    settings: &OutputSettings,
    card_type: CardType,
    transformation: &ColorTransformation,
    max_preview: SizePx,
    deadline: Deadline,
) -> Result<CardPreview, CardPrepError> {
    let (corrected, dimensions, placement) =
        render_stages(image, settings, card_type, transformation, &deadline)?;

    let geometry = scale_to_preview(&placement, settings.page_size, max_preview);

    let composited = composite_card(
        &corrected,
        &dimensions,
        placement.rotation_degrees,
        InterpolationFilter::Bilinear,
    )?;
    deadline.check("composite")?;

    let box_w = preview_side(geometry.card.width);
    let box_h = preview_side(geometry.card.height);
    let preview = resize(&composited, box_w, box_h, InterpolationFilter::Bilinear)?;
    let data_url = encode_png_data_url(&preview)?;
    deadline.check("encode")?;

    debug!(box_w, box_h, scale = geometry.scale, "rendered card preview");

    Ok(CardPreview {
        geometry,
        image: preview,
        data_url,
    })
}

/// Geometry, placement and color correction shared by both render paths.
fn render_stages(
    image: &RasterBuffer,
    settings: &OutputSettings,
    card_type: CardType,
    transformation: &ColorTransformation,
    deadline: &Deadline,
) -> Result<(RasterBuffer, RenderDimensions, CardPositioning), CardPrepError> {
    let dimensions = compute_render_dimensions(image.dimensions(), settings)?;
    let placement = resolve_card_positioning(&dimensions, settings, card_type);
    deadline.check("geometry")?;

    let corrected = apply_color_transformation(image, transformation);
    deadline.check("color")?;

    Ok((corrected, dimensions, placement))
}

fn preview_side(px: f64) -> u32 {
    if px.is_finite() && px >= 1.0 {
        px.round() as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::color::ColorParameter;
    use crate::pipeline::{CARD_BUDGET, DECODE_BUDGET};
    use crate::encode::encode_png;
    use crate::geometry::{CardRotation, SizeIn};

    /// 750x1050: exactly a 2.5x3.5 in card at 300 DPI.
    fn card_image() -> RasterBuffer {
        RasterBuffer::filled(750, 1050, [100, 100, 100, 255])
    }

    #[test]
    fn test_print_unrotated() {
        let placed = render_card_for_print(
            &card_image(),
            &OutputSettings::default(),
            CardType::Front,
            &ColorTransformation::default(),
        )
        .unwrap();
        assert_eq!((placed.image.width, placed.image.height), (750, 1050));
        assert!((placed.placement.x - 3.0).abs() < 1e-9);
        assert!((placed.placement.y - 3.75).abs() < 1e-9);
        assert_eq!(placed.image.pixel(375, 525), [100, 100, 100, 255]);
    }

    #[test]
    fn test_print_applies_color_and_rotation() {
        let settings = OutputSettings {
            rotation: CardRotation {
                front: 0.0,
                back: 90.0,
            },
            ..OutputSettings::default()
        };
        let brighter = ColorTransformation::default().with(ColorParameter::Brightness, 10.0);
        let placed = render_card_for_print(
            &card_image(),
            &settings,
            CardType::Back,
            &brighter,
        )
        .unwrap();
        assert_eq!((placed.image.width, placed.image.height), (1050, 750));
        assert_eq!(placed.placement.rotation_degrees, 90.0);
        let center = placed.image.pixel(525, 375);
        assert!(center[0] == 125 || center[0] == 126);
    }

    #[test]
    fn test_print_with_bleed_grows_canvas() {
        let settings = OutputSettings {
            bleed_in: 0.125,
            ..OutputSettings::default()
        };
        let placed = render_card_for_print(
            &card_image(),
            &settings,
            CardType::Front,
            &ColorTransformation::default(),
        )
        .unwrap();
        // (2.5 + 0.25) x 300, (3.5 + 0.25) x 300
        assert_eq!((placed.image.width, placed.image.height), (825, 1125));
        assert_eq!(placed.dimensions.card, SizeIn::new(2.75, 3.75));
    }

    #[test]
    fn test_print_invalid_settings() {
        let settings = OutputSettings {
            scale_percent: 0.0,
            ..OutputSettings::default()
        };
        let err = render_card_for_print(
            &card_image(),
            &settings,
            CardType::Front,
            &ColorTransformation::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CardPrepError::InvalidSettings { .. }));
    }

    #[test]
    fn test_print_deadline_expired() {
        let err = render_card_for_print_within(
            &card_image(),
            &OutputSettings::default(),
            CardType::Front,
            &ColorTransformation::default(),
            Deadline::after(Duration::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, CardPrepError::ProcessingTimeout { ref stage, .. } if stage == "geometry"));
    }

    #[test]
    fn test_preview_sized_to_box() {
        let preview = render_card_preview(
            &card_image(),
            &OutputSettings::default(),
            CardType::Front,
            &ColorTransformation::default(),
            SizePx::new(10_000.0, 10_000.0),
        )
        .unwrap();
        // 2.5 x 3.5 in at 72 DPI
        assert_eq!((preview.image.width, preview.image.height), (180, 252));
        assert!(preview.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(preview.image.pixel(90, 126), [100, 100, 100, 255]);
    }

    #[test]
    fn test_preview_bounded() {
        let preview = render_card_preview(
            &card_image(),
            &OutputSettings::default(),
            CardType::Front,
            &ColorTransformation::default(),
            SizePx::new(306.0, 396.0),
        )
        .unwrap();
        assert!((preview.geometry.scale - 0.5).abs() < 1e-9);
        assert_eq!((preview.image.width, preview.image.height), (90, 126));
    }

    #[test]
    fn test_decode_card_image() {
        let bytes = encode_png(&RasterBuffer::filled(3, 2, [1, 2, 3, 255])).unwrap();
        let raster = decode_card_image(&bytes).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        assert!(decode_card_image(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_preview_deadline_expired() {
        let err = render_card_preview_within(
            &card_image(),
            &OutputSettings::default(),
            CardType::Front,
            &ColorTransformation::default(),
            SizePx::new(600.0, 800.0),
            Deadline::after(Duration::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, CardPrepError::ProcessingTimeout { .. }));
    }

    #[test]
    fn test_decode_deadline_expired() {
        let bytes = encode_png(&RasterBuffer::filled(3, 2, [1, 2, 3, 255])).unwrap();
        let err = decode_card_image_within(&bytes, Deadline::after(Duration::ZERO)).unwrap_err();
        assert!(matches!(
            err,
            CardPrepError::ProcessingTimeout { ref stage, budget_ms: 0 } if stage == "decode"
        ));
    }

    #[test]
    fn test_default_budgets() {
        assert!(Deadline::for_decode().is_bounded());
        assert_eq!(Deadline::for_decode().budget(), DECODE_BUDGET);
        assert!(Deadline::for_card().is_bounded());
        assert_eq!(Deadline::for_card().budget(), CARD_BUDGET);
    }
}
