//! Corner response scoring.
//!
//! Two algorithms share one input (the gradient bundle) and one parameter
//! set. Both fill the interior (rows/cols 1..n-2) of a response map with the
//! source dimensions and track the global maximum in row-major order.

use harris_core::{FloatGrid, ResponseSummary, ResponseVariant};
use rayon::prelude::*;

use crate::error::{ensure_min_size, ensure_same_shape, HarrisError, HarrisResult};
use crate::gradient::MIN_GRADIENT_SIZE;
use crate::smoothing::{apply_gaussian_smoothing, validate_sigma};
use crate::types::{GradientBundle, ResponseParams, Stage};

pub(crate) fn validate_params(params: &ResponseParams) -> HarrisResult<()> {
    validate_sigma(params.sigma)?;
    if !params.k.is_finite() {
        return Err(HarrisError::InvalidK(params.k));
    }
    Ok(())
}

/// Score every interior pixel with the selected variant.
///
/// Returns the response map and the first location holding its maximum.
pub fn score_response(
    bundle: &GradientBundle,
    params: &ResponseParams,
) -> HarrisResult<(FloatGrid, ResponseSummary)> {
    validate_params(params)?;
    let (width, height) = bundle.dimensions();
    ensure_min_size(Stage::Response, width, height, MIN_GRADIENT_SIZE)?;
    for map in [&bundle.grad_x, &bundle.grad_y, &bundle.orientation] {
        ensure_same_shape(Stage::Response, (width, height), map.dimensions())?;
    }

    let response = match params.variant {
        ResponseVariant::SmoothedCrossTerm => smoothed_cross_term(bundle, params.sigma, params.k)?,
        ResponseVariant::DirectSecondMoment => direct_second_moment(bundle, params.k),
    };
    let summary = summarize(&response);
    log::trace!(
        "{} response max {} at ({}, {})",
        params.variant,
        summary.max,
        summary.location.x,
        summary.location.y
    );
    Ok((response, summary))
}

/// Variant A.
///
/// dx = |g| cos(theta), dy = |g| sin(theta), M = dx * dy. Both M and |g| are
/// Gaussian-smoothed, then R = M' - |g|' - k (2 |g|')^2.
fn smoothed_cross_term(bundle: &GradientBundle, sigma: f32, k: f32) -> HarrisResult<FloatGrid> {
    let (width, height) = bundle.dimensions();
    let magnitude = &bundle.magnitude;
    let orientation = &bundle.orientation;

    let mut cross = FloatGrid::like(magnitude);
    for_each_interior_row(&mut cross, |y, row| {
        let mag = magnitude.row(y);
        let ori = orientation.row(y);
        for x in 1..width - 1 {
            let dx = mag[x] * ori[x].cos();
            let dy = mag[x] * ori[x].sin();
            row[x] = dx * dy;
        }
    });

    let smoothed_magnitude = apply_gaussian_smoothing(magnitude, sigma)?;
    let smoothed_cross = apply_gaussian_smoothing(&cross, sigma)?;

    let mut response = FloatGrid::new(width, height);
    for_each_interior_row(&mut response, |y, row| {
        let sm = smoothed_magnitude.row(y);
        let sc = smoothed_cross.row(y);
        for x in 1..width - 1 {
            let det = sc[x] - sm[x];
            let trace = sm[x] + sm[x];
            row[x] = det - k * (trace * trace);
        }
    });
    Ok(response)
}

/// Variant B: R = Ixx Iyy - Ixy^2 - k (Ixx + Iyy)^2 from a single pixel.
fn direct_second_moment(bundle: &GradientBundle, k: f32) -> FloatGrid {
    let (width, height) = bundle.dimensions();
    let grad_x = &bundle.grad_x;
    let grad_y = &bundle.grad_y;

    let mut response = FloatGrid::new(width, height);
    for_each_interior_row(&mut response, |y, row| {
        let gx = grad_x.row(y);
        let gy = grad_y.row(y);
        for x in 1..width - 1 {
            let ixx = gx[x] * gx[x];
            let ixy = gx[x] * gy[x];
            let iyy = gy[x] * gy[x];
            row[x] = ixx * iyy - ixy * ixy - k * (ixx + iyy) * (ixx + iyy);
        }
    });
    response
}

/// Row-parallel fill of rows 1..height-1.
fn for_each_interior_row<F>(grid: &mut FloatGrid, fill: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    let (width, height) = grid.dimensions();
    grid.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| *y >= 1 && *y < height - 1)
        .for_each(|(y, row)| fill(y, row));
}

/// Sequential row-major scan of the interior with strict `>`, so the first
/// pixel attaining the maximum wins ties.
pub fn summarize(response: &FloatGrid) -> ResponseSummary {
    let (width, height) = response.dimensions();
    let mut summary = ResponseSummary::empty();
    for y in 1..height.saturating_sub(1) {
        let row = response.row(y);
        for x in 1..width.saturating_sub(1) {
            summary.observe(row[x], x, y);
        }
    }
    summary
}
