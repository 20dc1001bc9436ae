//! The user-picked card region that feeds the calibration grid.
//!
//! A region lives in card-space inches: origin at the top-left of the
//! unrotated card, one unit per printed inch. Preview pixels are always
//! derived from it (see [`SelectedRegion::to_preview`]), never stored.
//!
//! # Pixel-perfect extraction
//!
//! One grid cell prints at `final_card_px / count` pixels at 300 DPI. The
//! source maps onto the final card with
//! `source_to_final = source_width_px / final_card_width_px`, so the crop
//! takes `cell_px * source_to_final` source pixels per side. Only the
//! extraction rectangle is scaled; the pixels themselves are copied as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::axis::CalibrationGridConfig;
use crate::decode::{RasterBuffer, RasterDimensions};
use crate::error::CardPrepError;
use crate::geometry::{
    normalize_degrees, swaps_dimensions, validate_image_dimensions, PreviewGeometry, RectPx,
    SizeIn,
};
use crate::transform::{crop_pixels, PixelRect};
use crate::EXTRACTION_DPI;

/// Center and size of the calibration region, in card-space inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRegion {
    pub center_x_in: f64,
    pub center_y_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

impl SelectedRegion {
    /// A region sized to one grid cell of the final card, centered at the
    /// given card-space point.
    ///
    /// The center is pulled inward so the region stays on the card.
    pub fn for_grid(
        center_x_in: f64,
        center_y_in: f64,
        grid: CalibrationGridConfig,
        final_card: SizeIn,
    ) -> Result<Self, CardPrepError> {
        grid.validate()?;
        check_card(final_card)?;
        let mut region = Self {
            center_x_in,
            center_y_in,
            width_in: final_card.width / grid.columns as f64,
            height_in: final_card.height / grid.rows as f64,
        };
        region.keep_inside(final_card);
        Ok(region)
    }

    /// Create a region from a click on the layout preview.
    ///
    /// The point is in preview pixels; it is mapped back through the card's
    /// rotation into card space.
    pub fn pick_at_preview(
        x_px: f64,
        y_px: f64,
        geometry: &PreviewGeometry,
        grid: CalibrationGridConfig,
    ) -> Result<Self, CardPrepError> {
        let card = unrotated_card_in(geometry);
        let (cx, cy) = card_center_px(geometry);
        let ppi = geometry.pixels_per_inch;

        // Undo the clockwise card rotation
        let (sin, cos) = normalize_degrees(geometry.rotation_degrees)
            .to_radians()
            .sin_cos();
        let dx = (x_px - cx) / ppi;
        let dy = (y_px - cy) / ppi;
        let ux = dx * cos + dy * sin;
        let uy = -dx * sin + dy * cos;

        Self::for_grid(
            ux + card.width / 2.0,
            uy + card.height / 2.0,
            grid,
            card,
        )
    }

    /// Recompute the size after the grid configuration changed, keeping the
    /// center where the user put it.
    pub fn resize_for_grid(
        &self,
        grid: CalibrationGridConfig,
        final_card: SizeIn,
    ) -> Result<Self, CardPrepError> {
        Self::for_grid(self.center_x_in, self.center_y_in, grid, final_card)
    }

    /// Preview-pixel rectangle of this region.
    ///
    /// The center follows the card's rotation; quarter turns swap the
    /// rectangle's sides. Other angles keep the unrotated size.
    pub fn to_preview(&self, geometry: &PreviewGeometry) -> RectPx {
        let card = unrotated_card_in(geometry);
        let (cx, cy) = card_center_px(geometry);
        let ppi = geometry.pixels_per_inch;
        let rotation = normalize_degrees(geometry.rotation_degrees);

        let dx = self.center_x_in - card.width / 2.0;
        let dy = self.center_y_in - card.height / 2.0;
        let (sin, cos) = rotation.to_radians().sin_cos();
        let px = cx + (dx * cos - dy * sin) * ppi;
        let py = cy + (dx * sin + dy * cos) * ppi;

        let (w, h) = if swaps_dimensions(rotation) {
            (self.height_in * ppi, self.width_in * ppi)
        } else {
            (self.width_in * ppi, self.height_in * ppi)
        };

        RectPx {
            x: px - w / 2.0,
            y: py - h / 2.0,
            width: w,
            height: h,
        }
    }

    /// Copy this region's source pixels for the calibration grid.
    pub fn extract(
        &self,
        source: &RasterBuffer,
        grid: CalibrationGridConfig,
        final_card: SizeIn,
    ) -> Result<RasterBuffer, CardPrepError> {
        let rect = compute_pixel_perfect_crop(self, grid, source.dimensions(), final_card)?;
        Ok(crop_pixels(source, rect))
    }

    fn keep_inside(&mut self, card: SizeIn) {
        self.center_x_in = clamp_center(self.center_x_in, self.width_in, card.width);
        self.center_y_in = clamp_center(self.center_y_in, self.height_in, card.height);
    }
}

/// Source pixel rectangle that prints 1:1 onto one grid cell.
///
/// # Errors
///
/// * [`CardPrepError::InvalidSettings`] for a grid smaller than 2x2 or a
///   non-positive card size
/// * [`CardPrepError::InvalidImage`] for zero or oversized source dimensions
pub fn compute_pixel_perfect_crop(
    region: &SelectedRegion,
    grid: CalibrationGridConfig,
    source: RasterDimensions,
    final_card: SizeIn,
) -> Result<PixelRect, CardPrepError> {
    grid.validate()?;
    check_card(final_card)?;
    validate_image_dimensions(source)?;

    let final_w_px = final_card.width * EXTRACTION_DPI;
    let final_h_px = final_card.height * EXTRACTION_DPI;
    let cell_w_px = final_w_px / grid.columns as f64;
    let cell_h_px = final_h_px / grid.rows as f64;

    // One scale for both axes, taken from the width
    let source_to_final = source.width as f64 / final_w_px;

    let crop_w = crop_extent(cell_w_px * source_to_final, source.width);
    let crop_h = crop_extent(cell_h_px * source_to_final, source.height);

    let center_x = region.center_x_in * EXTRACTION_DPI * source_to_final;
    let center_y = region.center_y_in * EXTRACTION_DPI * source_to_final;
    let x = crop_origin(center_x, crop_w, source.width);
    let y = crop_origin(center_y, crop_h, source.height);

    debug!(
        x,
        y,
        crop_w,
        crop_h,
        source_to_final,
        "pixel-perfect calibration crop"
    );

    Ok(PixelRect::new(x, y, crop_w, crop_h))
}

/// Rounded crop size, at least one pixel and at most the source side.
fn crop_extent(pixels: f64, source_side: u32) -> u32 {
    let rounded = pixels.round();
    if !rounded.is_finite() || rounded < 1.0 {
        return 1;
    }
    (rounded.min(source_side as f64) as u32).max(1)
}

/// Left/top edge of a crop centered on `center`, shifted to stay in bounds.
fn crop_origin(center: f64, extent: u32, source_side: u32) -> u32 {
    let max_origin = source_side.saturating_sub(extent) as f64;
    let origin = (center - extent as f64 / 2.0).round();
    if !origin.is_finite() {
        return 0;
    }
    origin.clamp(0.0, max_origin) as u32
}

fn clamp_center(center: f64, extent: f64, side: f64) -> f64 {
    let half = extent / 2.0;
    if !center.is_finite() {
        return side / 2.0;
    }
    if half * 2.0 >= side {
        return side / 2.0;
    }
    center.clamp(half, side - half)
}

fn check_card(card: SizeIn) -> Result<(), CardPrepError> {
    if !(card.width.is_finite() && card.height.is_finite() && card.width > 0.0 && card.height > 0.0)
    {
        return Err(CardPrepError::settings(
            "finalCard",
            format!("must be positive, got {}x{} in", card.width, card.height),
        ));
    }
    Ok(())
}

/// Card size in inches before rotation, recovered from the preview box.
fn unrotated_card_in(geometry: &PreviewGeometry) -> SizeIn {
    let ppi = geometry.pixels_per_inch;
    let size = SizeIn::new(geometry.card.width / ppi, geometry.card.height / ppi);
    if swaps_dimensions(geometry.rotation_degrees) {
        size.transposed()
    } else {
        size
    }
}

fn card_center_px(geometry: &PreviewGeometry) -> (f64, f64) {
    (
        geometry.card.x + geometry.card.width / 2.0,
        geometry.card.y + geometry.card.height / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizePx;
    use crate::SCREEN_DPI;

    const EPS: f64 = 1e-9;

    fn geometry(rotation_degrees: f64) -> PreviewGeometry {
        // 2.5 x 3.5 in card at (3, 3.75) in, unscaled preview
        let (w, h) = if swaps_dimensions(rotation_degrees) {
            (3.5, 2.5)
        } else {
            (2.5, 3.5)
        };
        PreviewGeometry {
            page: SizePx::new(8.5 * SCREEN_DPI, 11.0 * SCREEN_DPI),
            card: RectPx {
                x: 3.0 * SCREEN_DPI,
                y: 3.75 * SCREEN_DPI,
                width: w * SCREEN_DPI,
                height: h * SCREEN_DPI,
            },
            scale: 1.0,
            pixels_per_inch: SCREEN_DPI,
            rotation_degrees,
        }
    }

    #[test]
    fn test_crop_width_scale_one() {
        // 3000x4200 source drawn on a 10x14 in card
        let region = SelectedRegion::for_grid(
            5.0,
            7.0,
            CalibrationGridConfig::new(5, 4),
            SizeIn::new(10.0, 14.0),
        )
        .unwrap();
        let rect = compute_pixel_perfect_crop(
            &region,
            CalibrationGridConfig::new(5, 4),
            RasterDimensions::new(3000, 4200),
            SizeIn::new(10.0, 14.0),
        )
        .unwrap();
        assert_eq!(rect.width, 600);
        assert_eq!(rect.height, 1050);
        assert_eq!(rect.x, 1200);
        assert_eq!(rect.y, 1575);
    }

    #[test]
    fn test_crop_scales_to_source_resolution() {
        // Half-resolution source: half as many source pixels per cell
        let grid = CalibrationGridConfig::new(4, 4);
        let card = SizeIn::new(2.5, 3.5);
        let region = SelectedRegion::for_grid(1.25, 1.75, grid, card).unwrap();
        let rect =
            compute_pixel_perfect_crop(&region, grid, RasterDimensions::new(375, 525), card)
                .unwrap();
        // 750 px / 4 = 187.5 print px, x0.5 = 93.75 → 94
        assert_eq!(rect.width, 94);
        // 1050 / 4 = 262.5, x0.5 = 131.25 → 131
        assert_eq!(rect.height, 131);
    }

    #[test]
    fn test_crop_stays_in_bounds_at_edge() {
        let grid = CalibrationGridConfig::new(2, 2);
        let card = SizeIn::new(2.0, 2.0);
        let region = SelectedRegion {
            center_x_in: 1.95,
            center_y_in: 0.0,
            width_in: 1.0,
            height_in: 1.0,
        };
        let rect =
            compute_pixel_perfect_crop(&region, grid, RasterDimensions::new(600, 600), card)
                .unwrap();
        assert_eq!((rect.width, rect.height), (300, 300));
        assert_eq!(rect.x, 300);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_crop_minimum_one_pixel() {
        let grid = CalibrationGridConfig::new(20, 20);
        let card = SizeIn::new(2.5, 3.5);
        let region = SelectedRegion::for_grid(1.0, 1.0, grid, card).unwrap();
        let rect =
            compute_pixel_perfect_crop(&region, grid, RasterDimensions::new(2, 3), card).unwrap();
        assert_eq!((rect.width, rect.height), (1, 1));
    }

    #[test]
    fn test_crop_rejects_bad_inputs() {
        let region = SelectedRegion::for_grid(
            1.0,
            1.0,
            CalibrationGridConfig::new(2, 2),
            SizeIn::new(2.5, 3.5),
        )
        .unwrap();
        assert!(compute_pixel_perfect_crop(
            &region,
            CalibrationGridConfig::new(1, 2),
            RasterDimensions::new(10, 10),
            SizeIn::new(2.5, 3.5)
        )
        .is_err());
        assert!(matches!(
            compute_pixel_perfect_crop(
                &region,
                CalibrationGridConfig::new(2, 2),
                RasterDimensions::new(0, 10),
                SizeIn::new(2.5, 3.5)
            ),
            Err(CardPrepError::InvalidImage { .. })
        ));
        assert!(compute_pixel_perfect_crop(
            &region,
            CalibrationGridConfig::new(2, 2),
            RasterDimensions::new(10, 10),
            SizeIn::new(0.0, 3.5)
        )
        .is_err());
    }

    #[test]
    fn test_for_grid_size_and_clamp() {
        let region = SelectedRegion::for_grid(
            0.0,
            10.0,
            CalibrationGridConfig::new(5, 7),
            SizeIn::new(2.5, 3.5),
        )
        .unwrap();
        assert!((region.width_in - 0.5).abs() < EPS);
        assert!((region.height_in - 0.5).abs() < EPS);
        assert!((region.center_x_in - 0.25).abs() < EPS);
        assert!((region.center_y_in - 3.25).abs() < EPS);
    }

    #[test]
    fn test_resize_keeps_center() {
        let card = SizeIn::new(2.5, 3.5);
        let region =
            SelectedRegion::for_grid(1.2, 1.6, CalibrationGridConfig::new(4, 4), card).unwrap();
        let resized = region
            .resize_for_grid(CalibrationGridConfig::new(5, 2), card)
            .unwrap();
        assert_eq!(resized.center_x_in, 1.2);
        assert_eq!(resized.center_y_in, 1.6);
        assert!((resized.width_in - 0.5).abs() < EPS);
        assert!((resized.height_in - 1.75).abs() < EPS);
    }

    #[test]
    fn test_to_preview_unrotated() {
        let region = SelectedRegion {
            center_x_in: 1.25,
            center_y_in: 1.75,
            width_in: 0.5,
            height_in: 1.0,
        };
        let rect = region.to_preview(&geometry(0.0));
        assert!((rect.x - (3.0 + 1.0) * SCREEN_DPI).abs() < 1e-6);
        assert!((rect.y - (3.75 + 1.25) * SCREEN_DPI).abs() < 1e-6);
        assert!((rect.width - 0.5 * SCREEN_DPI).abs() < 1e-6);
        assert!((rect.height - SCREEN_DPI).abs() < 1e-6);
    }

    #[test]
    fn test_to_preview_quarter_turn() {
        // Region in the card's top-left corner ends up top-right after 90° clockwise
        let region = SelectedRegion {
            center_x_in: 0.25,
            center_y_in: 0.25,
            width_in: 0.5,
            height_in: 0.5,
        };
        let g = geometry(90.0);
        let rect = region.to_preview(&g);
        let right = g.card.x + g.card.width;
        assert!((rect.x + rect.width - right).abs() < 1e-6);
        assert!((rect.y - g.card.y).abs() < 1e-6);
    }

    #[test]
    fn test_pick_round_trips_through_preview() {
        for rotation in [0.0, 90.0, 180.0, 270.0] {
            let g = geometry(rotation);
            let grid = CalibrationGridConfig::new(4, 4);
            let region = SelectedRegion::for_grid(0.9, 2.1, grid, SizeIn::new(2.5, 3.5)).unwrap();
            let rect = region.to_preview(&g);
            let picked = SelectedRegion::pick_at_preview(
                rect.x + rect.width / 2.0,
                rect.y + rect.height / 2.0,
                &g,
                grid,
            )
            .unwrap();
            assert!((picked.center_x_in - 0.9).abs() < 1e-6, "rotation {rotation}");
            assert!((picked.center_y_in - 2.1).abs() < 1e-6, "rotation {rotation}");
        }
    }

    #[test]
    fn test_extract_copies_exact_pixels() {
        let source = RasterBuffer::filled(300, 300, [5, 6, 7, 255]);
        let grid = CalibrationGridConfig::new(2, 2);
        let card = SizeIn::new(1.0, 1.0);
        let region = SelectedRegion::for_grid(0.5, 0.5, grid, card).unwrap();
        let crop = region.extract(&source, grid, card).unwrap();
        assert_eq!((crop.width, crop.height), (150, 150));
        assert_eq!(crop.pixel(0, 0), [5, 6, 7, 255]);
    }
}
