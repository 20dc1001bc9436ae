//! The 16-parameter color transformation and its parameter registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardPrepError;

/// Valid range, neutral default and slider step of one [`ColorParameter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParameterRange {
    const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp a value into this range.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One adjustable field of a [`ColorTransformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorParameter {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Gamma,
    Vibrance,
    RedMultiplier,
    GreenMultiplier,
    BlueMultiplier,
    Shadows,
    Highlights,
    MidtoneBalance,
    BlackPoint,
    WhitePoint,
    OutputBlack,
    OutputWhite,
}

impl ColorParameter {
    /// Every parameter, in pipeline order.
    pub const ALL: [ColorParameter; 16] = [
        ColorParameter::Brightness,
        ColorParameter::Contrast,
        ColorParameter::Saturation,
        ColorParameter::Hue,
        ColorParameter::Gamma,
        ColorParameter::Vibrance,
        ColorParameter::RedMultiplier,
        ColorParameter::GreenMultiplier,
        ColorParameter::BlueMultiplier,
        ColorParameter::Shadows,
        ColorParameter::Highlights,
        ColorParameter::MidtoneBalance,
        ColorParameter::BlackPoint,
        ColorParameter::WhitePoint,
        ColorParameter::OutputBlack,
        ColorParameter::OutputWhite,
    ];

    pub fn range(self) -> ParameterRange {
        match self {
            ColorParameter::Brightness => ParameterRange::new(-100.0, 100.0, 0.0, 1.0),
            ColorParameter::Contrast => ParameterRange::new(0.5, 2.0, 1.0, 0.01),
            ColorParameter::Saturation => ParameterRange::new(-100.0, 100.0, 0.0, 1.0),
            ColorParameter::Hue => ParameterRange::new(-180.0, 180.0, 0.0, 1.0),
            ColorParameter::Gamma => ParameterRange::new(0.5, 2.0, 1.0, 0.01),
            ColorParameter::Vibrance => ParameterRange::new(-100.0, 100.0, 0.0, 1.0),
            ColorParameter::RedMultiplier
            | ColorParameter::GreenMultiplier
            | ColorParameter::BlueMultiplier => ParameterRange::new(0.5, 1.5, 1.0, 0.01),
            ColorParameter::Shadows | ColorParameter::Highlights => {
                ParameterRange::new(-50.0, 50.0, 0.0, 1.0)
            }
            ColorParameter::MidtoneBalance => ParameterRange::new(-100.0, 100.0, 0.0, 1.0),
            ColorParameter::BlackPoint => ParameterRange::new(0.0, 50.0, 0.0, 1.0),
            ColorParameter::WhitePoint => ParameterRange::new(205.0, 255.0, 255.0, 1.0),
            ColorParameter::OutputBlack => ParameterRange::new(0.0, 30.0, 0.0, 1.0),
            ColorParameter::OutputWhite => ParameterRange::new(225.0, 255.0, 255.0, 1.0),
        }
    }

    /// Serialized (camelCase) name, as used by the UI.
    pub fn name(self) -> &'static str {
        match self {
            ColorParameter::Brightness => "brightness",
            ColorParameter::Contrast => "contrast",
            ColorParameter::Saturation => "saturation",
            ColorParameter::Hue => "hue",
            ColorParameter::Gamma => "gamma",
            ColorParameter::Vibrance => "vibrance",
            ColorParameter::RedMultiplier => "redMultiplier",
            ColorParameter::GreenMultiplier => "greenMultiplier",
            ColorParameter::BlueMultiplier => "blueMultiplier",
            ColorParameter::Shadows => "shadows",
            ColorParameter::Highlights => "highlights",
            ColorParameter::MidtoneBalance => "midtoneBalance",
            ColorParameter::BlackPoint => "blackPoint",
            ColorParameter::WhitePoint => "whitePoint",
            ColorParameter::OutputBlack => "outputBlack",
            ColorParameter::OutputWhite => "outputWhite",
        }
    }

    /// Human-readable label for calibration sheet headers.
    pub fn label(self) -> &'static str {
        match self {
            ColorParameter::Brightness => "Brightness",
            ColorParameter::Contrast => "Contrast",
            ColorParameter::Saturation => "Saturation",
            ColorParameter::Hue => "Hue",
            ColorParameter::Gamma => "Gamma",
            ColorParameter::Vibrance => "Vibrance",
            ColorParameter::RedMultiplier => "Red",
            ColorParameter::GreenMultiplier => "Green",
            ColorParameter::BlueMultiplier => "Blue",
            ColorParameter::Shadows => "Shadows",
            ColorParameter::Highlights => "Highlights",
            ColorParameter::MidtoneBalance => "Midtones",
            ColorParameter::BlackPoint => "Black Point",
            ColorParameter::WhitePoint => "White Point",
            ColorParameter::OutputBlack => "Output Black",
            ColorParameter::OutputWhite => "Output White",
        }
    }
}

impl fmt::Display for ColorParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown parameter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown color parameter: {0}")]
pub struct UnknownParameter(pub String);

impl FromStr for ColorParameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorParameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}

/// Color transformation parameters applied to a card image.
///
/// The default instance is the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorTransformation {
    /// Additive brightness (-100 to 100)
    pub brightness: f64,
    /// Contrast factor around mid-gray (0.5 to 2.0)
    pub contrast: f64,
    /// Relative HSL saturation change (-100 to 100)
    pub saturation: f64,
    /// Hue rotation in degrees (-180 to 180)
    pub hue: f64,
    /// Gamma (0.5 to 2.0), applied as `c^(1/gamma)`
    pub gamma: f64,
    /// Saturation boost that protects saturated colors (-100 to 100)
    pub vibrance: f64,
    /// Red channel multiplier (0.5 to 1.5)
    pub red_multiplier: f64,
    /// Green channel multiplier (0.5 to 1.5)
    pub green_multiplier: f64,
    /// Blue channel multiplier (0.5 to 1.5)
    pub blue_multiplier: f64,
    /// Shadow lift (-50 to 50)
    pub shadows: f64,
    /// Highlight lift (-50 to 50)
    pub highlights: f64,
    /// Uniform midtone offset (-100 to 100)
    pub midtone_balance: f64,
    /// Input black level (0 to 50)
    pub black_point: f64,
    /// Input white level (205 to 255)
    pub white_point: f64,
    /// Output black level (0 to 30)
    pub output_black: f64,
    /// Output white level (225 to 255)
    pub output_white: f64,
}

impl Default for ColorTransformation {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 0.0,
            hue: 0.0,
            gamma: 1.0,
            vibrance: 0.0,
            red_multiplier: 1.0,
            green_multiplier: 1.0,
            blue_multiplier: 1.0,
            shadows: 0.0,
            highlights: 0.0,
            midtone_balance: 0.0,
            black_point: 0.0,
            white_point: 255.0,
            output_black: 0.0,
            output_white: 255.0,
        }
    }
}

impl ColorTransformation {
    /// Create a new identity transformation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn get(&self, parameter: ColorParameter) -> f64 {
        match parameter {
            ColorParameter::Brightness => self.brightness,
            ColorParameter::Contrast => self.contrast,
            ColorParameter::Saturation => self.saturation,
            ColorParameter::Hue => self.hue,
            ColorParameter::Gamma => self.gamma,
            ColorParameter::Vibrance => self.vibrance,
            ColorParameter::RedMultiplier => self.red_multiplier,
            ColorParameter::GreenMultiplier => self.green_multiplier,
            ColorParameter::BlueMultiplier => self.blue_multiplier,
            ColorParameter::Shadows => self.shadows,
            ColorParameter::Highlights => self.highlights,
            ColorParameter::MidtoneBalance => self.midtone_balance,
            ColorParameter::BlackPoint => self.black_point,
            ColorParameter::WhitePoint => self.white_point,
            ColorParameter::OutputBlack => self.output_black,
            ColorParameter::OutputWhite => self.output_white,
        }
    }

    /// Overwrite one parameter. The value is stored as given; use
    /// [`ColorTransformation::clamped`] to enforce ranges.
    pub fn set(&mut self, parameter: ColorParameter, value: f64) {
        let field = match parameter {
            ColorParameter::Brightness => &mut self.brightness,
            ColorParameter::Contrast => &mut self.contrast,
            ColorParameter::Saturation => &mut self.saturation,
            ColorParameter::Hue => &mut self.hue,
            ColorParameter::Gamma => &mut self.gamma,
            ColorParameter::Vibrance => &mut self.vibrance,
            ColorParameter::RedMultiplier => &mut self.red_multiplier,
            ColorParameter::GreenMultiplier => &mut self.green_multiplier,
            ColorParameter::BlueMultiplier => &mut self.blue_multiplier,
            ColorParameter::Shadows => &mut self.shadows,
            ColorParameter::Highlights => &mut self.highlights,
            ColorParameter::MidtoneBalance => &mut self.midtone_balance,
            ColorParameter::BlackPoint => &mut self.black_point,
            ColorParameter::WhitePoint => &mut self.white_point,
            ColorParameter::OutputBlack => &mut self.output_black,
            ColorParameter::OutputWhite => &mut self.output_white,
        };
        *field = value;
    }

    /// Builder-style [`ColorTransformation::set`].
    pub fn with(mut self, parameter: ColorParameter, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    /// Copy with every parameter clamped into its valid range.
    /// Non-finite values fall back to the parameter default.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for parameter in ColorParameter::ALL {
            let range = parameter.range();
            let value = self.get(parameter);
            let value = if value.is_finite() {
                range.clamp(value)
            } else {
                range.default
            };
            out.set(parameter, value);
        }
        out
    }

    /// Check every parameter against its range.
    pub fn validate(&self) -> Result<(), CardPrepError> {
        for parameter in ColorParameter::ALL {
            let range = parameter.range();
            let value = self.get(parameter);
            if !range.contains(value) {
                return Err(CardPrepError::settings(
                    parameter.name(),
                    format!(
                        "must be within [{}, {}], got {}",
                        range.min, range.max, value
                    ),
                ));
            }
        }
        Ok(())
    }
}
