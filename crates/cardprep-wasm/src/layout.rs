//! Layout geometry WASM bindings.
//!
//! `settings` arguments are plain JS objects matching `OutputSettings`
//! (camelCase, every field optional):
//!
//! ```typescript
//! const settings = {
//!   pageSize: { width: 8.5, height: 11 },
//!   cardSize: { width: 2.5, height: 3.5 },
//!   bleedIn: 0.125,
//!   scalePercent: 100,
//!   sizingMode: 'fit-to-card',
//!   rotation: { front: 0, back: 180 },
//!   offset: { horizontal: 0, vertical: 0 },
//! };
//! ```

use std::str::FromStr;

use cardprep_core::decode::RasterDimensions;
use cardprep_core::geometry::{
    compute_render_dimensions, resolve_card_positioning, scale_to_preview, CardPositioning,
    CardType, OutputSettings, PreviewGeometry, RenderDimensions, SizePx,
};
use cardprep_core::CardPrepError;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// Everything the layout view needs for one card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CardLayout {
    render: RenderDimensions,
    positioning: CardPositioning,
    preview: PreviewGeometry,
}

pub(crate) fn card_layout(
    image: RasterDimensions,
    settings: &OutputSettings,
    card_type: CardType,
    max_preview: SizePx,
) -> Result<CardLayout, CardPrepError> {
    let render = compute_render_dimensions(image, settings)?;
    let positioning = resolve_card_positioning(&render, settings, card_type);
    let preview = scale_to_preview(&positioning, settings.page_size, max_preview);
    Ok(CardLayout {
        render,
        positioning,
        preview,
    })
}

/// Parse an `OutputSettings` object sent from JavaScript.
pub(crate) fn parse_settings(value: JsValue) -> Result<OutputSettings, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid output settings: {}", e)))
}

/// Parse `"front"` / `"back"`.
pub(crate) fn parse_card_type(value: &str) -> Result<CardType, JsValue> {
    CardType::from_str(value).map_err(to_js_error)
}

/// Compute render dimensions, page placement and preview geometry for a card.
///
/// # Arguments
///
/// * `image_width` / `image_height` - Source image size in pixels (300 DPI)
/// * `settings` - Output settings object
/// * `card_type` - `"front"` or `"back"`
/// * `max_preview_width` / `max_preview_height` - Preview area bounds in pixels
///
/// # Returns
///
/// `{ render, positioning, preview }`, all in camelCase.
#[wasm_bindgen]
pub fn compute_card_layout(
    image_width: u32,
    image_height: u32,
    settings: JsValue,
    card_type: &str,
    max_preview_width: f64,
    max_preview_height: f64,
) -> Result<JsValue, JsValue> {
    let settings = parse_settings(settings)?;
    let card_type = parse_card_type(card_type)?;
    let layout = card_layout(
        RasterDimensions::new(image_width, image_height),
        &settings,
        card_type,
        SizePx::new(max_preview_width, max_preview_height),
    )
    .map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&layout).map_err(|e| JsValue::from_str(&e.to_string()))
}
