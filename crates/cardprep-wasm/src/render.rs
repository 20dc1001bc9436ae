//! End-to-end card rendering bindings.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! // Layout preview: geometry plus a PNG data URL
//! const preview = render_card_preview(image, settings, 'front', colors, 600, 800);
//! img.src = preview.dataUrl;
//!
//! // Print: composited card at 300 DPI plus its page placement in inches
//! const placed = render_card(image, settings, 'front', colors);
//! pdf.drawImage(encode_png(placed.image), placed.x, placed.y, placed.width, placed.height);
//! ```

use cardprep_core::geometry::CardPositioning;
use cardprep_core::pipeline::{self, PlacedCard};
use cardprep_core::SizePx;
use wasm_bindgen::prelude::*;

use crate::color::JsColorTransformation;
use crate::layout::{parse_card_type, parse_settings};
use crate::to_js_error;
use crate::types::JsRasterBuffer;

/// A composited card and its page placement, in inches.
#[wasm_bindgen]
pub struct JsPlacedCard {
    image: JsRasterBuffer,
    placement: CardPositioning,
}

#[wasm_bindgen]
impl JsPlacedCard {
    /// The composited card at print resolution. Returns a copy.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsRasterBuffer {
        JsRasterBuffer::from_raster(self.image.raster().clone())
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.placement.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.placement.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.placement.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.placement.height
    }

    #[wasm_bindgen(getter)]
    pub fn rotation_degrees(&self) -> f64 {
        self.placement.rotation_degrees
    }
}

impl From<PlacedCard> for JsPlacedCard {
    fn from(card: PlacedCard) -> Self {
        Self {
            image: JsRasterBuffer::from_raster(card.image),
            placement: card.placement,
        }
    }
}

/// Render one card for print: color correction, then rotation and
/// compositing into the card container at 300 DPI. Fails if rendering runs
/// past the 15 s card budget.
#[wasm_bindgen]
pub fn render_card(
    image: &JsRasterBuffer,
    settings: JsValue,
    card_type: &str,
    transformation: &JsColorTransformation,
) -> Result<JsPlacedCard, JsValue> {
    let settings = parse_settings(settings)?;
    let card_type = parse_card_type(card_type)?;
    pipeline::render_card_for_print(
        image.raster(),
        &settings,
        card_type,
        transformation.inner(),
    )
    .map(JsPlacedCard::from)
    .map_err(to_js_error)
}

/// Render one card for the layout preview.
///
/// # Returns
///
/// `{ geometry, dataUrl }` where `geometry` is the preview geometry and
/// `dataUrl` a PNG of the card sized to its preview box.
#[wasm_bindgen]
pub fn render_card_preview(
    image: &JsRasterBuffer,
    settings: JsValue,
    card_type: &str,
    transformation: &JsColorTransformation,
    max_preview_width: f64,
    max_preview_height: f64,
) -> Result<JsValue, JsValue> {
    let settings = parse_settings(settings)?;
    let card_type = parse_card_type(card_type)?;
    let preview = pipeline::render_card_preview(
        image.raster(),
        &settings,
        card_type,
        transformation.inner(),
        SizePx::new(max_preview_width, max_preview_height),
    )
    .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&preview).map_err(|e| JsValue::from_str(&e.to_string()))
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cardprep_core::decode::RasterBuffer;
    use cardprep_core::geometry::OutputSettings;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn card() -> JsRasterBuffer {
        JsRasterBuffer::from_raster(RasterBuffer::filled(75, 105, [50, 60, 70, 255]))
    }

    #[wasm_bindgen_test]
    fn test_render_card() {
        let settings = serde_wasm_bindgen::to_value(&OutputSettings::default()).unwrap();
        let placed = render_card(&card(), settings, "back", &JsColorTransformation::new()).unwrap();
        assert_eq!((placed.image().width(), placed.image().height()), (750, 1050));
    }

    #[wasm_bindgen_test]
    fn test_render_card_preview_data_url() {
        let settings = serde_wasm_bindgen::to_value(&OutputSettings::default()).unwrap();
        let preview = render_card_preview(
            &card(),
            settings,
            "front",
            &JsColorTransformation::new(),
            600.0,
            800.0,
        )
        .unwrap();
        let url = js_sys::Reflect::get(&preview, &"dataUrl".into()).unwrap();
        assert!(url.as_string().unwrap().starts_with("data:image/png;base64,"));
    }
}
