//! Output settings supplied by the layout step of the UI.
//!
//! Settings are validated once, at the boundary, by
//! [`OutputSettings::validate`]. Everything downstream assumes valid input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardPrepError;

/// Largest accepted bleed, in inches.
pub const MAX_BLEED_IN: f64 = 2.0;
/// Largest accepted scale, in percent.
pub const MAX_SCALE_PERCENT: f64 = 500.0;

/// A width/height pair in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeIn {
    pub width: f64,
    pub height: f64,
}

impl SizeIn {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Swap width and height.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Size in whole pixels at the given DPI, rounded, at least 1x1.
    pub fn to_pixels(&self, dpi: f64) -> (u64, u64) {
        (
            ((self.width * dpi).round() as u64).max(1),
            ((self.height * dpi).round() as u64).max(1),
        )
    }

    fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Policy mapping an extracted image onto the card container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingMode {
    /// Keep the extracted size at 300 DPI.
    ActualSize,
    /// Scale to fit entirely inside the card (may letterbox).
    #[default]
    FitToCard,
    /// Scale to cover the whole card (may crop).
    FillCard,
}

impl SizingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SizingMode::ActualSize => "actual-size",
            SizingMode::FitToCard => "fit-to-card",
            SizingMode::FillCard => "fill-card",
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizingMode {
    type Err = CardPrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actual-size" => Ok(SizingMode::ActualSize),
            "fit-to-card" => Ok(SizingMode::FitToCard),
            "fill-card" => Ok(SizingMode::FillCard),
            other => Err(CardPrepError::settings(
                "sizingMode",
                format!("unrecognized mode '{}'", other),
            )),
        }
    }
}

/// Which face of the card is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Front,
    Back,
}

impl FromStr for CardType {
    type Err = CardPrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(CardType::Front),
            "back" => Ok(CardType::Back),
            other => Err(CardPrepError::settings(
                "cardType",
                format!("expected 'front' or 'back', got '{}'", other),
            )),
        }
    }
}

/// Rotation per card face, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRotation {
    pub front: f64,
    pub back: f64,
}

impl CardRotation {
    pub fn for_card(&self, card_type: CardType) -> f64 {
        match card_type {
            CardType::Front => self.front,
            CardType::Back => self.back,
        }
    }
}

/// Offset from the centered position, in inches. Positive moves right/down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardOffset {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Everything the geometry pipeline needs to place one card on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    /// Output page size.
    pub page_size: SizeIn,
    /// Nominal card size, without bleed.
    pub card_size: SizeIn,
    /// Bleed added on every side (0 to 2 in).
    pub bleed_in: f64,
    /// Uniform scale applied to card and image (0 exclusive to 500).
    pub scale_percent: f64,
    pub sizing_mode: SizingMode,
    pub rotation: CardRotation,
    pub offset: CardOffset,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            // US Letter
            page_size: SizeIn::new(8.5, 11.0),
            // Standard poker card
            card_size: SizeIn::new(2.5, 3.5),
            bleed_in: 0.0,
            scale_percent: 100.0,
            sizing_mode: SizingMode::FitToCard,
            rotation: CardRotation::default(),
            offset: CardOffset::default(),
        }
    }
}

impl OutputSettings {
    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<(), CardPrepError> {
        if !self.card_size.is_positive() {
            return Err(CardPrepError::settings(
                "cardSize",
                format!(
                    "must be positive, got {}x{} in",
                    self.card_size.width, self.card_size.height
                ),
            ));
        }
        if !self.page_size.is_positive() {
            return Err(CardPrepError::settings(
                "pageSize",
                format!(
                    "must be positive, got {}x{} in",
                    self.page_size.width, self.page_size.height
                ),
            ));
        }
        if !(0.0..=MAX_BLEED_IN).contains(&self.bleed_in) {
            return Err(CardPrepError::settings(
                "bleedIn",
                format!("must be within [0, {}] in, got {}", MAX_BLEED_IN, self.bleed_in),
            ));
        }
        if !(self.scale_percent > 0.0 && self.scale_percent <= MAX_SCALE_PERCENT) {
            return Err(CardPrepError::settings(
                "scalePercent",
                format!(
                    "must be within (0, {}] %, got {}",
                    MAX_SCALE_PERCENT, self.scale_percent
                ),
            ));
        }
        if !(self.rotation.front.is_finite() && self.rotation.back.is_finite()) {
            return Err(CardPrepError::settings("rotation", "must be finite"));
        }
        if !(self.offset.horizontal.is_finite() && self.offset.vertical.is_finite()) {
            return Err(CardPrepError::settings("offset", "must be finite"));
        }
        Ok(())
    }

    /// Card size with bleed on all sides, before scaling.
    pub fn target_size(&self) -> SizeIn {
        SizeIn::new(
            self.card_size.width + 2.0 * self.bleed_in,
            self.card_size.height + 2.0 * self.bleed_in,
        )
    }

    /// Scale as a multiplier.
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        assert!(OutputSettings::default().validate().is_ok());
    }

    #[test]
    fn test_target_size_adds_bleed_twice() {
        let mut s = OutputSettings::default();
        s.bleed_in = 0.125;
        assert_eq!(s.target_size(), SizeIn::new(2.75, 3.75));
    }

    fn field_of(s: &OutputSettings) -> &'static str {
        match s.validate() {
            Err(CardPrepError::InvalidSettings { field, .. }) => field,
            other => panic!("expected InvalidSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_card() {
        let mut s = OutputSettings::default();
        s.card_size.width = 0.0;
        assert_eq!(field_of(&s), "cardSize");
        s.card_size = SizeIn::new(2.5, -1.0);
        assert_eq!(field_of(&s), "cardSize");
    }

    #[test]
    fn test_bleed_bounds() {
        let mut s = OutputSettings::default();
        s.bleed_in = 2.0;
        assert!(s.validate().is_ok());
        s.bleed_in = 2.01;
        assert_eq!(field_of(&s), "bleedIn");
        s.bleed_in = -0.1;
        assert_eq!(field_of(&s), "bleedIn");
        s.bleed_in = f64::NAN;
        assert_eq!(field_of(&s), "bleedIn");
    }

    #[test]
    fn test_scale_bounds() {
        let mut s = OutputSettings::default();
        s.scale_percent = 500.0;
        assert!(s.validate().is_ok());
        s.scale_percent = 0.0;
        assert_eq!(field_of(&s), "scalePercent");
        s.scale_percent = 500.5;
        assert_eq!(field_of(&s), "scalePercent");
    }

    #[test]
    fn test_offsets_unconstrained() {
        let mut s = OutputSettings::default();
        s.offset = CardOffset {
            horizontal: -40.0,
            vertical: 90.0,
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_sizing_mode_parse() {
        assert_eq!("fill-card".parse::<SizingMode>().unwrap(), SizingMode::FillCard);
        assert_eq!(
            "actual-size".parse::<SizingMode>().unwrap(),
            SizingMode::ActualSize
        );
        assert!(matches!(
            "stretch".parse::<SizingMode>(),
            Err(CardPrepError::InvalidSettings {
                field: "sizingMode",
                ..
            })
        ));
        for mode in [
            SizingMode::ActualSize,
            SizingMode::FitToCard,
            SizingMode::FillCard,
        ] {
            assert_eq!(mode.to_string().parse::<SizingMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_rotation_lookup() {
        let r = CardRotation {
            front: 90.0,
            back: 270.0,
        };
        assert_eq!(r.for_card(CardType::Front), 90.0);
        assert_eq!(r.for_card(CardType::Back), 270.0);
    }

    #[test]
    fn test_size_to_pixels() {
        assert_eq!(SizeIn::new(2.5, 3.5).to_pixels(300.0), (750, 1050));
        assert_eq!(SizeIn::new(0.0001, 0.0001).to_pixels(300.0), (1, 1));
    }
}
