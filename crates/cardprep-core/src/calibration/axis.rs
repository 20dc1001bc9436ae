//! Grid axes: which parameter varies along each direction, and its values.

use serde::{Deserialize, Serialize};

use crate::color::ColorParameter;
use crate::error::CardPrepError;

/// Grid shape. Both counts must be at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationGridConfig {
    pub columns: usize,
    pub rows: usize,
}

impl CalibrationGridConfig {
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn validate(&self) -> Result<(), CardPrepError> {
        if self.columns < 2 {
            return Err(CardPrepError::settings(
                "columns",
                format!("must be at least 2, got {}", self.columns),
            ));
        }
        if self.rows < 2 {
            return Err(CardPrepError::settings(
                "rows",
                format!("must be at least 2, got {}", self.rows),
            ));
        }
        Ok(())
    }
}

impl Default for CalibrationGridConfig {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// A parameter swept between two values along one grid direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformationAxis {
    pub parameter: ColorParameter,
    pub min: f64,
    pub max: f64,
}

impl TransformationAxis {
    pub const fn new(parameter: ColorParameter, min: f64, max: f64) -> Self {
        Self {
            parameter,
            min,
            max,
        }
    }

    /// Sweep the parameter's full valid range.
    pub fn full_range(parameter: ColorParameter) -> Self {
        let range = parameter.range();
        Self::new(parameter, range.min, range.max)
    }

    /// Both ends must be finite and inside the parameter's range.
    pub fn validate(&self) -> Result<(), CardPrepError> {
        let range = self.parameter.range();
        for value in [self.min, self.max] {
            if !value.is_finite() || !range.contains(value) {
                return Err(CardPrepError::settings(
                    "axis",
                    format!(
                        "{} value {} outside [{}, {}]",
                        self.parameter, value, range.min, range.max
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Evenly spaced values for `count` cells.
    pub fn values(&self, count: usize) -> Vec<f64> {
        generate_transformation_values(self.min, self.max, count)
    }

    /// Display labels for `count` cells.
    ///
    /// Parameters stepped in whole units print as integers, the rest with
    /// two decimals.
    pub fn labels(&self, count: usize) -> Vec<String> {
        let integral = self.parameter.range().step >= 1.0;
        self.values(count)
            .into_iter()
            .map(|value| {
                if integral {
                    format!("{:.0}", value)
                } else {
                    format!("{:.2}", value)
                }
            })
            .collect()
    }
}

/// Evenly spaced values from `min` to `max` inclusive.
///
/// One value yields the midpoint; zero values yield nothing.
pub fn generate_transformation_values(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(min + max) / 2.0],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    // Land exactly on the endpoint
                    if i == count - 1 {
                        max
                    } else {
                        min + i as f64 * step
                    }
                })
                .collect()
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: count, endpoints and strictly increasing values.
        #[test]
        fn prop_values_shape(
            min in -100.0f64..100.0,
            span in 0.01f64..100.0,
            count in 2usize..=12,
        ) {
            let max = min + span;
            let values = generate_transformation_values(min, max, count);
            prop_assert_eq!(values.len(), count);
            prop_assert_eq!(values[0], min);
            prop_assert_eq!(values[count - 1], max);
            for pair in values.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }
    }
}
