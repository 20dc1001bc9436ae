//! Printer calibration: parameter sweeps over a pixel-exact card region.
//!
//! # Workflow
//!
//! 1. The user picks a point on the card preview ([`SelectedRegion::pick_at_preview`])
//! 2. The region's source pixels are copied without resampling
//!    ([`SelectedRegion::extract`], [`compute_pixel_perfect_crop`])
//! 3. Two [`TransformationAxis`] sweeps render an N x M grid of variants
//!    ([`generate_calibration_grid`])
//! 4. After printing, measured misalignment is fed back into the output
//!    offset ([`OffsetCorrection`])

mod axis;
mod grid;
mod measurement;
mod region;

pub use axis::{generate_transformation_values, CalibrationGridConfig, TransformationAxis};
pub use grid::{generate_calibration_grid, CalibrationGrid, CalibrationOptions};
pub use measurement::{corrected_offset, OffsetCorrection};
pub use region::{compute_pixel_perfect_crop, SelectedRegion};
