//! Color transformation of card images.
//!
//! A [`ColorTransformation`] holds 16 parameters, each addressed by a
//! [`ColorParameter`]. The engine applies them to an RGBA raster in a fixed
//! order; alpha is never touched.
//!
//! The default transformation is an identity transform, so a freshly
//! extracted card prints exactly as extracted until the user moves a slider.

mod engine;
pub mod hsl;
mod transformation;

pub use engine::{
    apply_color_transformation, transform_pixel, try_apply_color_transformation,
    ColorTransformError,
};
pub use transformation::{ColorParameter, ColorTransformation, ParameterRange, UnknownParameter};
