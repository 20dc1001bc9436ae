//! Raster types and decoding of extracted card images.
//!
//! Card images arrive from the page-extraction collaborator either as encoded
//! bytes or as raw RGBA pixels. Everything downstream works on
//! [`RasterBuffer`], an RGBA8 buffer in row-major order.
//!
//! Decoding is delegated to the `image` crate.

mod source;
mod types;

pub use source::decode_image;
pub use types::{RasterBuffer, RasterDimensions, CHANNELS};
