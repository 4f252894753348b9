//! Debug renderers for intermediate detection maps.

use harris_core::{BoolGrid, Corner, FloatGrid};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::{CliError, CliResult};

/// Outer radius of the marker rings
pub const MARKER_RADIUS: i32 = 5;
/// Ring thickness in pixels
pub const MARKER_THICKNESS: i32 = 2;

pub const CANDIDATE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const CORNER_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Min-max normalize a float map to 0..=255.
///
/// A flat map renders black. Non-finite values are ignored when finding the
/// range and render black.
pub fn heat_map(grid: &FloatGrid) -> GrayImage {
    let (lo, hi) = grid
        .as_slice()
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        let v = grid.get(x as usize, y as usize);
        if !(range > 0.0) || !v.is_finite() {
            return Luma([0]);
        }
        let scaled = ((v - lo) / range * 255.0).round();
        Luma([scaled.clamp(0.0, 255.0) as u8])
    })
}

/// Red rings at every true cell of `mask`, drawn over `base`.
pub fn overlay_mask(base: &GrayImage, mask: &BoolGrid) -> CliResult<RgbImage> {
    let expected = (base.width() as usize, base.height() as usize);
    if mask.dimensions() != expected {
        return Err(CliError::OverlayMismatch {
            expected,
            actual: mask.dimensions(),
        });
    }
    let mut canvas = to_rgb(base);
    for (x, y, _) in mask.cells().filter(|&(_, _, &m)| m) {
        draw_ring(&mut canvas, x, y, CANDIDATE_COLOR);
    }
    Ok(canvas)
}

/// Blue rings at every corner, drawn over `base`.
pub fn overlay_corners(base: &GrayImage, corners: &[Corner]) -> RgbImage {
    let mut canvas = to_rgb(base);
    for c in corners {
        draw_ring(&mut canvas, c.x, c.y, CORNER_COLOR);
    }
    canvas
}

fn to_rgb(base: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(base.clone()).into_rgb8()
}

fn draw_ring(canvas: &mut RgbImage, x: usize, y: usize, color: Rgb<u8>) {
    let center = (x as i32, y as i32);
    for r in MARKER_RADIUS - MARKER_THICKNESS + 1..=MARKER_RADIUS {
        draw_hollow_circle_mut(canvas, center, r, color);
    }
}
