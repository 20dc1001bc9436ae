//! Calibration grid generation.
//!
//! Cell (row, col) is the crop source rendered with the baseline
//! transformation, the horizontal axis parameter set to its `col`-th value and
//! the vertical axis parameter set to its `row`-th value. Cells are
//! independent, so they can be rendered on a bounded rayon pool; results are
//! always reassembled in (row, col) order.

use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::axis::{CalibrationGridConfig, TransformationAxis};
use crate::color::{try_apply_color_transformation, ColorTransformation};
use crate::decode::RasterBuffer;
use crate::error::CardPrepError;
use crate::geometry::validate_image_dimensions;
use crate::pipeline::{Deadline, CARD_BUDGET};

/// Execution options for grid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationOptions {
    /// Worker threads for cell rendering. 1 renders row-major on the caller's thread.
    pub max_workers: usize,
    /// Budget per cell. `None` disables the check.
    pub cell_deadline: Option<Duration>,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            max_workers: 1,
            cell_deadline: Some(CARD_BUDGET),
        }
    }
}

/// Finished grid: `cells[row][col]` plus the axis values that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationGrid {
    pub cells: Vec<Vec<RasterBuffer>>,
    pub horizontal_values: Vec<f64>,
    pub vertical_values: Vec<f64>,
    pub axis_h: TransformationAxis,
    pub axis_v: TransformationAxis,
}

impl CalibrationGrid {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.horizontal_values.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&RasterBuffer> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    /// Column labels, left to right.
    pub fn horizontal_labels(&self) -> Vec<String> {
        self.axis_h.labels(self.columns())
    }

    /// Row labels, top to bottom.
    pub fn vertical_labels(&self) -> Vec<String> {
        self.axis_v.labels(self.rows())
    }

    /// The transformation cell (row, col) was rendered with.
    pub fn transformation_at(
        &self,
        baseline: &ColorTransformation,
        row: usize,
        col: usize,
    ) -> Option<ColorTransformation> {
        let h = *self.horizontal_values.get(col)?;
        let v = *self.vertical_values.get(row)?;
        Some(cell_transformation(baseline, &self.axis_h, &self.axis_v, h, v))
    }
}

/// Baseline with both axis parameters overwritten. The vertical axis wins
/// when both axes name the same parameter.
fn cell_transformation(
    baseline: &ColorTransformation,
    axis_h: &TransformationAxis,
    axis_v: &TransformationAxis,
    h: f64,
    v: f64,
) -> ColorTransformation {
    baseline.with(axis_h.parameter, h).with(axis_v.parameter, v)
}

/// Render every cell of a calibration grid.
///
/// `crop_source` is the pixel-perfect region crop (see
/// [`super::SelectedRegion::extract`]).
///
/// # Errors
///
/// * [`CardPrepError::InvalidSettings`] for a grid smaller than 2x2, an axis
///   outside its parameter range, or an invalid baseline
/// * [`CardPrepError::InvalidImage`] for an empty or oversized crop source
/// * [`CardPrepError::ColorTransform`] for the first cell whose
///   transformation fails; the whole grid is abandoned
/// * [`CardPrepError::ProcessingTimeout`] if a cell exceeds its budget
pub fn generate_calibration_grid(
    crop_source: &RasterBuffer,
    axis_h: &TransformationAxis,
    axis_v: &TransformationAxis,
    grid: CalibrationGridConfig,
    baseline: &ColorTransformation,
    options: &CalibrationOptions,
) -> Result<CalibrationGrid, CardPrepError> {
    grid.validate()?;
    axis_h.validate()?;
    axis_v.validate()?;
    baseline.validate()?;
    validate_image_dimensions(crop_source.dimensions())?;

    let horizontal_values = axis_h.values(grid.columns);
    let vertical_values = axis_v.values(grid.rows);

    debug!(
        columns = grid.columns,
        rows = grid.rows,
        horizontal = %axis_h.parameter,
        vertical = %axis_v.parameter,
        workers = options.max_workers,
        "generating calibration grid"
    );

    let render_cell = |index: usize| -> Result<RasterBuffer, CardPrepError> {
        let row = index / grid.columns;
        let col = index % grid.columns;
        let deadline = Deadline::from_budget(options.cell_deadline);
        let transformation = cell_transformation(
            baseline,
            axis_h,
            axis_v,
            horizontal_values[col],
            vertical_values[row],
        );
        let cell = try_apply_color_transformation(crop_source, &transformation)
            .map_err(|source| CardPrepError::ColorTransform { row, col, source })?;
        deadline.check(&format!("calibration cell ({}, {})", row, col))?;
        Ok(cell)
    };

    let count = grid.cell_count();
    let flat: Vec<RasterBuffer> = if options.max_workers > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(options.max_workers)
            .build()
        {
            Ok(pool) => pool.install(|| {
                (0..count)
                    .into_par_iter()
                    .map(&render_cell)
                    .collect::<Result<Vec<_>, CardPrepError>>()
            })?,
            Err(err) => {
                warn!(error = %err, "calibration worker pool unavailable, rendering sequentially");
                (0..count).map(&render_cell).collect::<Result<Vec<_>, CardPrepError>>()?
            }
        }
    } else {
        (0..count).map(&render_cell).collect::<Result<Vec<_>, CardPrepError>>()?
    };

    let mut cells_iter = flat.into_iter();
    let cells = (0..grid.rows)
        .map(|_| cells_iter.by_ref().take(grid.columns).collect())
        .collect();

    Ok(CalibrationGrid {
        cells,
        horizontal_values,
        vertical_values,
        axis_h: *axis_h,
        axis_v: *axis_v,
    })
}
