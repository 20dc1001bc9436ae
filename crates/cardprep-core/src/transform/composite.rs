//! Card compositing: rotate, center and clip a source image into the card
//! container.
//!
//! # Algorithm
//!
//! The output canvas is the card container at print resolution, with width
//! and height swapped for quarter-turn rotations. Each output pixel is mapped
//! back into the source by inverse transform:
//!
//! ```text
//! dx, dy  = output pixel center - canvas center
//! ix      =  dx * cos(θ) + dy * sin(θ)       (undo the rotation)
//! iy      = -dx * sin(θ) + dy * cos(θ)
//! u, v    = ix + image_w / 2, iy + image_h / 2   (image render space)
//! src     = (u, v) * source_px / image_px
//! ```
//!
//! A source larger than its render size is first shrunk to that size with the
//! same filter, so sampling never skips source pixels.
//!
//! Rotation is clockwise on screen (y points down). Output pixels whose
//! `(u, v)` falls outside the image render box stay transparent; image parts
//! outside the canvas are simply never sampled, which is the clipping.

use tracing::{debug, warn};

use super::resize::resize;
use super::InterpolationFilter;
use crate::decode::{RasterBuffer, CHANNELS};
use crate::error::CardPrepError;
use crate::geometry::{normalize_degrees, swaps_dimensions, validate_image_dimensions, RenderDimensions};
use crate::{EXTRACTION_DPI, MAX_CANVAS_DIMENSION};

/// Composite a source image into its card container.
///
/// # Arguments
///
/// * `image` - Extracted card image at the extraction DPI
/// * `dims` - Render geometry from [`crate::geometry::compute_render_dimensions`]
/// * `rotation_degrees` - Card rotation, any value (normalized to [0, 360))
/// * `filter` - Sampling filter (Bilinear for preview, Lanczos3 for print)
///
/// # Errors
///
/// * [`CardPrepError::InvalidImage`] for an empty, malformed or oversized source
/// * [`CardPrepError::CanvasAllocation`] if a canvas side exceeds
///   [`MAX_CANVAS_DIMENSION`] or the buffer cannot be allocated
///
/// A degenerate image render size is not fatal: the source is returned
/// unrotated, stretched to the container, and a warning is logged.
pub fn composite_card(
    image: &RasterBuffer,
    dims: &RenderDimensions,
    rotation_degrees: f64,
    filter: InterpolationFilter,
) -> Result<RasterBuffer, CardPrepError> {
    validate_image_dimensions(image.dimensions())?;
    if !image.is_well_formed() {
        return Err(CardPrepError::InvalidImage {
            width: image.width,
            height: image.height,
            reason: "pixel buffer does not match dimensions".to_string(),
        });
    }

    let rotation = normalize_degrees(rotation_degrees);
    let (container_w, container_h) = dims.card.to_pixels(EXTRACTION_DPI);
    let (canvas_w, canvas_h) = if swaps_dimensions(rotation) {
        (container_h, container_w)
    } else {
        (container_w, container_h)
    };
    check_canvas(canvas_w, canvas_h)?;
    let (canvas_w, canvas_h) = (canvas_w as u32, canvas_h as u32);

    let image_w = dims.image.width * EXTRACTION_DPI;
    let image_h = dims.image.height * EXTRACTION_DPI;
    if !(image_w.is_finite() && image_h.is_finite() && image_w > 0.0 && image_h > 0.0) {
        warn!(image_w, image_h, "degenerate image render size, drawing unrotated");
        return resize(image, container_w as u32, container_h as u32, filter);
    }

    // Shrink to the render size first: each canvas pixel then covers at most
    // one source pixel and the samplers below see no skipped detail.
    let shrunk = shrink_to_render_size(image, image_w, image_h, filter)?;
    let image = shrunk.as_ref().unwrap_or(image);

    // Fast path: unrotated, and the image already is the canvas
    if rotation == 0.0
        && image.width == canvas_w
        && image.height == canvas_h
        && (image_w - canvas_w as f64).abs() < 1e-6
        && (image_h - canvas_h as f64).abs() < 1e-6
    {
        return Ok(image.clone());
    }

    let mut output = allocate_canvas(canvas_w, canvas_h)?;

    let angle_rad = rotation.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();
    let canvas_cx = canvas_w as f64 / 2.0;
    let canvas_cy = canvas_h as f64 / 2.0;
    let src_per_image_x = image.width as f64 / image_w;
    let src_per_image_y = image.height as f64 / image_h;

    for dst_y in 0..canvas_h {
        let dy = dst_y as f64 + 0.5 - canvas_cy;
        for dst_x in 0..canvas_w {
            let dx = dst_x as f64 + 0.5 - canvas_cx;

            let u = dx * cos + dy * sin + image_w / 2.0;
            let v = -dx * sin + dy * cos + image_h / 2.0;
            if u < 0.0 || u >= image_w || v < 0.0 || v >= image_h {
                continue;
            }

            // Source coordinates relative to pixel centers
            let src_x = u * src_per_image_x - 0.5;
            let src_y = v * src_per_image_y - 0.5;

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            let idx = (dst_y as usize * canvas_w as usize + dst_x as usize) * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    debug!(canvas_w, canvas_h, rotation, "composited card");

    Ok(RasterBuffer {
        width: canvas_w,
        height: canvas_h,
        pixels: output,
    })
}

fn check_canvas(width: u64, height: u64) -> Result<(), CardPrepError> {
    if width > MAX_CANVAS_DIMENSION as u64 || height > MAX_CANVAS_DIMENSION as u64 {
        return Err(CardPrepError::CanvasAllocation {
            width,
            height,
            max: MAX_CANVAS_DIMENSION,
        });
    }
    Ok(())
}

/// Allocate a transparent canvas, reporting allocation failure as an error.
fn allocate_canvas(width: u32, height: u32) -> Result<Vec<u8>, CardPrepError> {
    let len = width as usize * height as usize * CHANNELS;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| CardPrepError::CanvasAllocation {
            width: width as u64,
            height: height as u64,
            max: MAX_CANVAS_DIMENSION,
        })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Downscale `image` on every axis where it is larger than its render size.
///
/// Returns `None` when no axis shrinks.
fn shrink_to_render_size(
    image: &RasterBuffer,
    image_w: f64,
    image_h: f64,
    filter: InterpolationFilter,
) -> Result<Option<RasterBuffer>, CardPrepError> {
    let target_w = (image_w.round() as u32).clamp(1, image.width);
    let target_h = (image_h.round() as u32).clamp(1, image.height);
    if target_w == image.width && target_h == image.height {
        return Ok(None);
    }
    debug!(
        from_w = image.width,
        from_h = image.height,
        target_w,
        target_h,
        "shrinking source to render size"
    );
    resize(image, target_w, target_h, filter).map(Some)
}

/// Get a pixel as [f64; 4], clamping coordinates to the image edge.
#[inline]
fn get_pixel_f64(image: &RasterBuffer, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width as i64 - 1) as usize;
    let y = py.clamp(0, image.height as i64 - 1) as usize;
    let idx = (y * image.width as usize + x) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

#[inline]
fn to_u8(v: [f64; 4]) -> [u8; 4] {
    v.map(|c| c.clamp(0.0, 255.0).round() as u8)
}

fn sample_nearest(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    to_u8(get_pixel_f64(image, x.round() as i64, y.round() as i64))
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance.
fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0.0f64; 4];
    for i in 0..CHANNELS {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    to_u8(result)
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels, providing
/// higher quality results especially for sharp edges.
fn sample_lanczos3(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    // Small images cannot host the kernel
    if image.width < 6 || image.height < 6 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            for i in 0..CHANNELS {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }
    to_u8(sum.map(|s| s / weight_sum))
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
