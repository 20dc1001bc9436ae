//! Color transformation WASM bindings.
//!
//! Parameters are addressed by their serialized name (`"brightness"`,
//! `"redMultiplier"`, ...), the same names the JSON form uses.

use std::str::FromStr;

use cardprep_core::color::{self, ColorParameter, ColorTransformation};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::JsRasterBuffer;

/// Color transformation wrapper for JavaScript
#[wasm_bindgen]
pub struct JsColorTransformation {
    inner: ColorTransformation,
}

/// Range metadata for one parameter, as sent to the slider UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParameterInfo {
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default_value: f64,
    step: f64,
}

impl ParameterInfo {
    fn of(parameter: ColorParameter) -> Self {
        let range = parameter.range();
        Self {
            name: parameter.name(),
            label: parameter.label(),
            min: range.min,
            max: range.max,
            default_value: range.default,
            step: range.step,
        }
    }
}

#[wasm_bindgen]
impl JsColorTransformation {
    /// Create a transformation with every parameter at its neutral default
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: ColorTransformation::default(),
        }
    }

    /// Get a parameter value by name
    pub fn get(&self, name: &str) -> Result<f64, JsValue> {
        let parameter = parse_parameter(name)?;
        Ok(self.inner.get(parameter))
    }

    /// Set a parameter value by name, clamped to its valid range
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        let parameter = parse_parameter(name)?;
        self.set_clamped(parameter, value);
        Ok(())
    }

    /// Reset every parameter to its default
    pub fn reset(&mut self) {
        self.inner = ColorTransformation::default();
    }

    /// Check if all parameters are at default values
    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON. Missing fields take their defaults; values
    /// are clamped to their ranges.
    pub fn from_json(value: JsValue) -> Result<JsColorTransformation, JsValue> {
        let inner: ColorTransformation =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: inner.clamped(),
        })
    }

    /// Names, labels and ranges of all parameters, in pipeline order
    pub fn parameters() -> Result<JsValue, JsValue> {
        let infos: Vec<ParameterInfo> = ColorParameter::ALL
            .iter()
            .map(|p| ParameterInfo::of(*p))
            .collect();
        serde_wasm_bindgen::to_value(&infos).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for JsColorTransformation {
    fn default() -> Self {
        Self::new()
    }
}

impl JsColorTransformation {
    pub(crate) fn inner(&self) -> &ColorTransformation {
        &self.inner
    }

    fn set_clamped(&mut self, parameter: ColorParameter, value: f64) {
        let range = parameter.range();
        let value = if value.is_finite() {
            range.clamp(value)
        } else {
            range.default
        };
        self.inner.set(parameter, value);
    }
}

fn parse_parameter(name: &str) -> Result<ColorParameter, JsValue> {
    ColorParameter::from_str(name).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply a color transformation to an image.
///
/// Never fails: if the transformation cannot be applied, a warning is logged
/// to the browser console and an unmodified copy is returned.
///
/// # Example (TypeScript)
/// ```typescript
/// const t = new JsColorTransformation();
/// t.set('brightness', 10);
/// t.set('contrast', 1.2);
///
/// const corrected = apply_color_transformation(sourceImage, t);
/// ```
#[wasm_bindgen]
pub fn apply_color_transformation(
    image: &JsRasterBuffer,
    transformation: &JsColorTransformation,
) -> JsRasterBuffer {
    JsRasterBuffer::from_raster(color::apply_color_transformation(
        image.raster(),
        transformation.inner(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardprep_core::decode::RasterBuffer;

    #[test]
    fn test_new_is_default() {
        let t = JsColorTransformation::new();
        assert!(t.is_default());
    }

    #[test]
    fn test_set_clamps() {
        let mut t = JsColorTransformation::new();
        t.set_clamped(ColorParameter::Contrast, 5.0);
        assert_eq!(t.inner().contrast, 2.0);
        t.set_clamped(ColorParameter::Hue, f64::NAN);
        assert_eq!(t.inner().hue, 0.0);
        assert!(!t.is_default());
        t.reset();
        assert!(t.is_default());
    }

    #[test]
    fn test_parameter_info() {
        let info = ParameterInfo::of(ColorParameter::WhitePoint);
        assert_eq!(info.name, "whitePoint");
        assert_eq!((info.min, info.max, info.default_value), (205.0, 255.0, 255.0));
    }

    #[test]
    fn test_apply_brightness() {
        let image = JsRasterBuffer::from_raster(RasterBuffer::filled(4, 4, [100, 100, 100, 200]));
        let mut t = JsColorTransformation::new();
        t.set_clamped(ColorParameter::Brightness, 10.0);
        let out = apply_color_transformation(&image, &t);
        let px = out.raster().pixel(0, 0);
        assert!(px[0] == 125 || px[0] == 126);
        assert_eq!(px[3], 200);
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_get_set_by_name() {
        let mut t = JsColorTransformation::new();
        t.set("redMultiplier", 1.25).unwrap();
        assert_eq!(t.get("redMultiplier").unwrap(), 1.25);
    }

    #[wasm_bindgen_test]
    fn test_unknown_name_rejected() {
        let t = JsColorTransformation::new();
        assert!(t.get("exposure").is_err());
    }

    #[wasm_bindgen_test]
    fn test_json_round_trip() {
        let mut t = JsColorTransformation::new();
        t.set("gamma", 1.4).unwrap();
        let json = t.to_json().unwrap();
        let restored = JsColorTransformation::from_json(json).unwrap();
        assert_eq!(restored.get("gamma").unwrap(), 1.4);
    }

    #[wasm_bindgen_test]
    fn test_parameters_listed() {
        let value = JsColorTransformation::parameters().unwrap();
        assert!(js_sys::Array::is_array(&value));
        assert_eq!(js_sys::Array::from(&value).length(), 16);
    }
}
