//! Offset correction from a printed alignment test.
//!
//! The user prints a sheet, measures how far the card landed from where it
//! should be, and enters that shift. Positive shifts mean the print landed
//! right of / below the target; the correction moves the card the other way.

use serde::{Deserialize, Serialize};

use crate::geometry::{CardOffset, OutputSettings};

/// Offset that cancels a measured shift: `current - measured_shift`.
#[inline]
pub fn corrected_offset(current: f64, measured_shift: f64) -> f64 {
    current - measured_shift
}

/// A measured print shift, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffsetCorrection {
    pub horizontal_shift_in: f64,
    pub vertical_shift_in: f64,
}

impl OffsetCorrection {
    pub const fn new(horizontal_shift_in: f64, vertical_shift_in: f64) -> Self {
        Self {
            horizontal_shift_in,
            vertical_shift_in,
        }
    }

    /// The offset after correcting `offset` for this shift.
    pub fn correct(&self, offset: CardOffset) -> CardOffset {
        CardOffset {
            horizontal: corrected_offset(offset.horizontal, self.horizontal_shift_in),
            vertical: corrected_offset(offset.vertical, self.vertical_shift_in),
        }
    }

    /// Settings with the offset corrected; everything else unchanged.
    pub fn apply(&self, settings: &OutputSettings) -> OutputSettings {
        OutputSettings {
            offset: self.correct(settings.offset),
            ..*settings
        }
    }
}
