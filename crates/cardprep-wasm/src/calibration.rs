//! Calibration WASM bindings.
//!
//! # Workflow (TypeScript)
//!
//! ```typescript
//! // 1. User clicks the card preview
//! let region = select_region(evt.offsetX, evt.offsetY, layout.preview, 4, 4);
//! overlay(region_preview_rect(region, layout.preview));
//!
//! // 2. Exact source pixels for one cell
//! const crop = pixel_perfect_crop(image, region, 4, 4, 2.5, 3.5);
//!
//! // 3. Sweep two parameters
//! const grid = generate_calibration_grid(
//!   crop,
//!   { parameter: 'brightness', min: -20, max: 20 },
//!   { parameter: 'contrast', min: 0.8, max: 1.3 },
//!   4, 4, baseline,
//! );
//! ```

use cardprep_core::calibration::{
    self, CalibrationGrid, CalibrationGridConfig, CalibrationOptions, SelectedRegion,
    TransformationAxis,
};
use cardprep_core::color::ColorTransformation;
use cardprep_core::decode::RasterBuffer;
use cardprep_core::geometry::{PreviewGeometry, SizeIn};
use cardprep_core::CardPrepError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::color::JsColorTransformation;
use crate::to_js_error;
use crate::types::JsRasterBuffer;

/// A finished calibration grid for JavaScript.
#[wasm_bindgen]
pub struct JsCalibrationGrid {
    inner: CalibrationGrid,
}

#[wasm_bindgen]
impl JsCalibrationGrid {
    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[wasm_bindgen(getter)]
    pub fn columns(&self) -> usize {
        self.inner.columns()
    }

    /// Cell at (row, col), or `undefined` out of range. Returns a copy.
    pub fn cell(&self, row: usize, col: usize) -> Option<JsRasterBuffer> {
        self.inner
            .cell(row, col)
            .map(|cell| JsRasterBuffer::from_raster(cell.clone()))
    }

    /// Parameter values along the columns
    pub fn horizontal_values(&self) -> Vec<f64> {
        self.inner.horizontal_values.clone()
    }

    /// Parameter values along the rows
    pub fn vertical_values(&self) -> Vec<f64> {
        self.inner.vertical_values.clone()
    }

    /// Column labels for the printed sheet
    pub fn horizontal_labels(&self) -> Vec<String> {
        self.inner.horizontal_labels()
    }

    /// Row labels for the printed sheet
    pub fn vertical_labels(&self) -> Vec<String> {
        self.inner.vertical_labels()
    }
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Pick a calibration region at a point on the layout preview.
///
/// # Arguments
///
/// * `x_px` / `y_px` - Click position in preview pixels
/// * `preview` - The `preview` geometry from `compute_card_layout`
/// * `columns` / `rows` - Grid size; the region is one cell of the card
///
/// # Returns
///
/// `{ centerXIn, centerYIn, widthIn, heightIn }` in card-space inches.
#[wasm_bindgen]
pub fn select_region(
    x_px: f64,
    y_px: f64,
    preview: JsValue,
    columns: usize,
    rows: usize,
) -> Result<JsValue, JsValue> {
    let geometry: PreviewGeometry = from_js(preview, "preview geometry")?;
    let region = SelectedRegion::pick_at_preview(
        x_px,
        y_px,
        &geometry,
        CalibrationGridConfig::new(columns, rows),
    )
    .map_err(to_js_error)?;
    to_js(&region)
}

/// Preview-pixel rectangle of a region, for drawing the selection overlay.
#[wasm_bindgen]
pub fn region_preview_rect(region: JsValue, preview: JsValue) -> Result<JsValue, JsValue> {
    let region: SelectedRegion = from_js(region, "region")?;
    let geometry: PreviewGeometry = from_js(preview, "preview geometry")?;
    to_js(&region.to_preview(&geometry))
}

/// Resize a region for a new grid size, keeping its center.
#[wasm_bindgen]
pub fn resize_region_for_grid(
    region: JsValue,
    columns: usize,
    rows: usize,
    card_width_in: f64,
    card_height_in: f64,
) -> Result<JsValue, JsValue> {
    let region: SelectedRegion = from_js(region, "region")?;
    let resized = region
        .resize_for_grid(
            CalibrationGridConfig::new(columns, rows),
            SizeIn::new(card_width_in, card_height_in),
        )
        .map_err(to_js_error)?;
    to_js(&resized)
}

/// Copy the exact source pixels that print 1:1 onto one grid cell.
#[wasm_bindgen]
pub fn pixel_perfect_crop(
    source: &JsRasterBuffer,
    region: JsValue,
    columns: usize,
    rows: usize,
    card_width_in: f64,
    card_height_in: f64,
) -> Result<JsRasterBuffer, JsValue> {
    let region: SelectedRegion = from_js(region, "region")?;
    region
        .extract(
            source.raster(),
            CalibrationGridConfig::new(columns, rows),
            SizeIn::new(card_width_in, card_height_in),
        )
        .map(JsRasterBuffer::from_raster)
        .map_err(to_js_error)
}

/// Render a calibration grid from a cropped region.
///
/// `axis_h` and `axis_v` are `{ parameter, min, max }` objects. Any cell that
/// fails aborts the whole grid.
#[wasm_bindgen]
pub fn generate_calibration_grid(
    crop_source: &JsRasterBuffer,
    axis_h: JsValue,
    axis_v: JsValue,
    columns: usize,
    rows: usize,
    baseline: &JsColorTransformation,
) -> Result<JsCalibrationGrid, JsValue> {
    let axis_h: TransformationAxis = from_js(axis_h, "horizontal axis")?;
    let axis_v: TransformationAxis = from_js(axis_v, "vertical axis")?;
    build_grid(
        crop_source.raster(),
        &axis_h,
        &axis_v,
        CalibrationGridConfig::new(columns, rows),
        baseline.inner(),
    )
    .map(|inner| JsCalibrationGrid { inner })
    .map_err(to_js_error)
}

/// Grid generation on the calling thread with the default per-cell budget.
fn build_grid(
    crop_source: &RasterBuffer,
    axis_h: &TransformationAxis,
    axis_v: &TransformationAxis,
    grid: CalibrationGridConfig,
    baseline: &ColorTransformation,
) -> Result<CalibrationGrid, CardPrepError> {
    let options = CalibrationOptions::default();
    calibration::generate_calibration_grid(crop_source, axis_h, axis_v, grid, baseline, &options)
}

/// Offset that cancels a measured print shift (`current - measured_shift`).
#[wasm_bindgen]
pub fn corrected_offset(current: f64, measured_shift: f64) -> f64 {
    calibration::corrected_offset(current, measured_shift)
}
