//! Per-pixel color transformation pipeline.
//!
//! ## Stage Order
//! 1. Normalize to [0, 1]
//! 2. Gamma
//! 3. Brightness
//! 4. Contrast
//! 5. HSL: saturation, hue shift, vibrance
//! 6. Channel multipliers
//! 7. Shadows / highlights / midtones (luminance weighted)
//! 8. Levels (input remap, then output remap) in 0-255 space
//! 9. Round and clamp, alpha untouched
//!
//! Reordering any stage changes the output.

use thiserror::Error;
use tracing::warn;

use super::hsl::{hsl_to_rgb, rgb_to_hsl, wrap_hue};
use super::transformation::{ColorParameter, ColorTransformation};
use crate::decode::{RasterBuffer, CHANNELS};

/// Failure inside the color pipeline.
///
/// Never fatal on its own: [`apply_color_transformation`] recovers by passing
/// the source through unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorTransformError {
    /// A parameter is NaN or infinite.
    #[error("Parameter {parameter} is not a finite number")]
    NonFiniteParameter { parameter: ColorParameter },

    /// The pixel buffer length does not match its dimensions.
    #[error("Malformed raster: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    /// A channel became NaN or infinite during the pipeline.
    #[error("Non-finite channel value at pixel {pixel}")]
    NonFiniteResult { pixel: usize },
}

/// Apply a color transformation, degrading to the untransformed image on failure.
///
/// The source buffer is not modified. On failure a warning is logged and a
/// copy of the source is returned, so the preview keeps showing something
/// sensible.
pub fn apply_color_transformation(
    image: &RasterBuffer,
    transformation: &ColorTransformation,
) -> RasterBuffer {
    match try_apply_color_transformation(image, transformation) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "color transformation failed, showing untransformed image");
            image.clone()
        }
    }
}

/// Apply a color transformation, reporting failures to the caller.
///
/// Used where a silently untransformed result is unacceptable (calibration
/// sheets).
pub fn try_apply_color_transformation(
    image: &RasterBuffer,
    transformation: &ColorTransformation,
) -> Result<RasterBuffer, ColorTransformError> {
    for parameter in ColorParameter::ALL {
        if !transformation.get(parameter).is_finite() {
            return Err(ColorTransformError::NonFiniteParameter { parameter });
        }
    }

    if !image.is_well_formed() {
        return Err(ColorTransformError::MalformedBuffer {
            expected: image.pixel_count() * CHANNELS,
            actual: image.pixels.len(),
        });
    }

    let mut output = image.clone();

    // Early exit if no adjustments
    if transformation.is_default() {
        return Ok(output);
    }

    for (index, chunk) in output.pixels.chunks_exact_mut(CHANNELS).enumerate() {
        let rgb = transform_pixel([chunk[0], chunk[1], chunk[2]], transformation)
            .ok_or(ColorTransformError::NonFiniteResult { pixel: index })?;
        chunk[..3].copy_from_slice(&rgb);
    }

    Ok(output)
}

/// Run one RGB pixel through the full pipeline.
///
/// Returns `None` if any intermediate value stops being finite.
pub fn transform_pixel(rgb: [u8; 3], t: &ColorTransformation) -> Option<[u8; 3]> {
    let mut r = rgb[0] as f64 / 255.0;
    let mut g = rgb[1] as f64 / 255.0;
    let mut b = rgb[2] as f64 / 255.0;

    (r, g, b) = apply_gamma(r, g, b, t.gamma);
    (r, g, b) = apply_brightness(r, g, b, t.brightness);
    (r, g, b) = apply_contrast(r, g, b, t.contrast);
    (r, g, b) = apply_hsl_adjustments(r, g, b, t.saturation, t.hue, t.vibrance);
    r = clamp01(r * t.red_multiplier);
    g = clamp01(g * t.green_multiplier);
    b = clamp01(b * t.blue_multiplier);
    (r, g, b) = apply_tonal_balance(r, g, b, t.shadows, t.highlights, t.midtone_balance);

    let mut out = [0u8; 3];
    for (slot, c) in out.iter_mut().zip([r, g, b]) {
        let v = apply_levels(
            c * 255.0,
            t.black_point,
            t.white_point,
            t.output_black,
            t.output_white,
        );
        if !v.is_finite() {
            return None;
        }
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[inline]
fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// `c' = c^(1/gamma)`
#[inline]
fn apply_gamma(r: f64, g: f64, b: f64, gamma: f64) -> (f64, f64, f64) {
    if gamma == 1.0 {
        return (r, g, b);
    }
    let exponent = 1.0 / gamma;
    (r.powf(exponent), g.powf(exponent), b.powf(exponent))
}

/// `c' = clamp(c + brightness/100)`
#[inline]
fn apply_brightness(r: f64, g: f64, b: f64, brightness: f64) -> (f64, f64, f64) {
    let shift = brightness / 100.0;
    (clamp01(r + shift), clamp01(g + shift), clamp01(b + shift))
}

/// `c' = clamp((c - 0.5) * contrast + 0.5)`
#[inline]
fn apply_contrast(r: f64, g: f64, b: f64, contrast: f64) -> (f64, f64, f64) {
    let f = |c: f64| clamp01((c - 0.5) * contrast + 0.5);
    (f(r), f(g), f(b))
}

/// Saturation, hue shift and vibrance in HSL space.
///
/// Vibrance adds `vibrance/100 * (1 - s)`, so already saturated colors move
/// the least.
#[inline]
fn apply_hsl_adjustments(
    r: f64,
    g: f64,
    b: f64,
    saturation: f64,
    hue: f64,
    vibrance: f64,
) -> (f64, f64, f64) {
    if saturation == 0.0 && hue == 0.0 && vibrance == 0.0 {
        return (r, g, b);
    }
    let (h, s, l) = rgb_to_hsl(r, g, b);

    let s = clamp01(s * (1.0 + saturation / 100.0));
    let h = wrap_hue(h + hue / 360.0);
    let s = clamp01(s + vibrance / 100.0 * (1.0 - s));

    hsl_to_rgb(h, s, l)
}

/// Luminance-weighted shadow/highlight lift plus a flat midtone offset.
#[inline]
fn apply_tonal_balance(
    r: f64,
    g: f64,
    b: f64,
    shadows: f64,
    highlights: f64,
    midtone_balance: f64,
) -> (f64, f64, f64) {
    // ITU-R BT.601 weights
    let lum = 0.299 * r + 0.587 * g + 0.114 * b;
    let shadow_adj = (shadows / 50.0) * (1.0 - lum) * 0.3;
    let highlight_adj = (highlights / 50.0) * lum * 0.3;
    let midtone_adj = midtone_balance / 100.0 * 0.2;
    let total = shadow_adj + highlight_adj + midtone_adj;
    (clamp01(r + total), clamp01(g + total), clamp01(b + total))
}

/// Levels remap on a 0-255 channel value.
#[inline]
fn apply_levels(
    c: f64,
    black_point: f64,
    white_point: f64,
    output_black: f64,
    output_white: f64,
) -> f64 {
    let c = if white_point > black_point {
        ((c - black_point) * 255.0 / (white_point - black_point)).clamp(0.0, 255.0)
    } else {
        c
    };
    output_black + (c / 255.0) * (output_white - output_black)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
