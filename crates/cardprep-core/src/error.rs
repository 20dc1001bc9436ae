//! Error types shared by the geometry, compositing and calibration pipelines.
//!
//! Two failure modes are kept apart:
//!
//! * [`CardPrepError`] is fatal for the card or calibration cell being
//!   processed. Nothing partial is returned alongside it.
//! * [`crate::color::ColorTransformError`] is recoverable. The preview path
//!   logs it and shows the untransformed image; calibration generation wraps
//!   it in [`CardPrepError::ColorTransform`] and aborts the sheet.

use thiserror::Error;

use crate::color::ColorTransformError;

/// Fatal errors returned by the cardprep pipelines.
#[derive(Debug, Error)]
pub enum CardPrepError {
    /// Source image pixel dimensions are zero or exceed the hard cap.
    #[error("Invalid image: {width}x{height} px ({reason})")]
    InvalidImage {
        width: u32,
        height: u32,
        reason: String,
    },

    /// An output setting is out of range or unrecognized.
    #[error("Invalid settings: {field} {reason}")]
    InvalidSettings { field: &'static str, reason: String },

    /// The output canvas would exceed the allocation cap.
    #[error("Canvas {width}x{height} px exceeds the {max} px limit")]
    CanvasAllocation { width: u64, height: u64, max: u32 },

    /// An operation ran past its deadline.
    #[error("{stage} timed out after {budget_ms} ms")]
    ProcessingTimeout { stage: String, budget_ms: u128 },

    /// Source bytes could not be decoded into a raster.
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// A finished raster could not be encoded for transport.
    #[error("Image encode failed: {0}")]
    ImageEncode(String),

    /// A color transformation failed where a silent pass-through is not acceptable.
    #[error("Color transformation failed for cell ({row}, {col}): {source}")]
    ColorTransform {
        row: usize,
        col: usize,
        #[source]
        source: ColorTransformError,
    },

    /// The result belongs to a generation that has been superseded.
    #[error("Generation {generation} superseded by {latest}")]
    StaleGeneration { generation: u64, latest: u64 },
}

impl CardPrepError {
    /// Shorthand for an [`CardPrepError::InvalidSettings`] error.
    pub(crate) fn settings(field: &'static str, reason: impl Into<String>) -> Self {
        CardPrepError::InvalidSettings {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true for errors that must surface as a blocking alert rather
    /// than a logged preview degradation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CardPrepError::StaleGeneration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_display() {
        let err = CardPrepError::settings("bleed", "must be within [0, 2] in, got 3");
        assert_eq!(
            err.to_string(),
            "Invalid settings: bleed must be within [0, 2] in, got 3"
        );
    }

    #[test]
    fn test_canvas_allocation_display() {
        let err = CardPrepError::CanvasAllocation {
            width: 12_000,
            height: 800,
            max: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Canvas 12000x800 px exceeds the 10000 px limit"
        );
    }

    #[test]
    fn test_stale_generation_not_fatal() {
        let stale = CardPrepError::StaleGeneration {
            generation: 1,
            latest: 2,
        };
        assert!(!stale.is_fatal());
        assert!(CardPrepError::ImageDecode("truncated".into()).is_fatal());
    }
}
