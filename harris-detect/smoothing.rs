use harris_core::FloatGrid;
use rayon::prelude::*;

use crate::error::{ensure_window_fits, window_side, HarrisError, HarrisResult};
use crate::types::Stage;

pub(crate) fn validate_sigma(sigma: f32) -> HarrisResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HarrisError::InvalidSigma(sigma));
    }
    Ok(())
}

/// Kernel half-size: floor(sigma), saturating at `usize::MAX`
#[inline]
pub fn kernel_radius(sigma: f32) -> usize {
    sigma.floor() as usize
}

/// Normalized 2D Gaussian kernel of side `2 * floor(sigma) + 1`.
///
/// Weights use the real-valued sigma; only the extent is truncated.
pub fn gaussian_kernel(sigma: f32) -> HarrisResult<FloatGrid> {
    validate_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    let side = window_side(radius)
        .filter(|&side| {
            side.checked_mul(side)
                .is_some_and(|n| n <= isize::MAX as usize / std::mem::size_of::<f32>())
        })
        .ok_or(HarrisError::InvalidSigma(sigma))?;
    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;

    let mut weights = Vec::with_capacity(side * side);
    let mut sum = 0.0f32;
    for y in -r..=r {
        for x in -r..=r {
            let w = (-((x * x + y * y) as f32) / denom).exp();
            weights.push(w);
            sum += w;
        }
    }
    for w in &mut weights {
        *w /= sum;
    }

    Ok(FloatGrid::from_vec(side, side, weights)?)
}

/// Convolve `grid` with a Gaussian of standard deviation `sigma`.
///
/// Only pixels at least `floor(sigma)` away from every edge are convolved.
/// The margin is left at 0.0; there is no edge replication.
pub fn apply_gaussian_smoothing(grid: &FloatGrid, sigma: f32) -> HarrisResult<FloatGrid> {
    validate_sigma(sigma)?;
    let radius = kernel_radius(sigma);
    let (width, height) = grid.dimensions();
    // Size check first: the kernel for a huge sigma must never be allocated.
    ensure_window_fits(Stage::Smoothing, width, height, radius)?;
    let kernel = gaussian_kernel(sigma)?;
    let side = kernel.width();

    let mut output = FloatGrid::like(grid);
    output
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| *y >= radius && *y < height - radius)
        .for_each(|(y, out_row)| {
            for x in radius..width - radius {
                let mut acc = 0.0f32;
                for j in 0..side {
                    let src = grid.row(y + j - radius);
                    let ker = kernel.row(j);
                    for i in 0..side {
                        acc += src[x + i - radius] * ker[i];
                    }
                }
                out_row[x] = acc;
            }
        });

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_shape_and_normalization() {
        for (sigma, side) in [(0.5f32, 1usize), (1.0, 3), (1.7, 3), (2.0, 5), (3.2, 7)] {
            let k = gaussian_kernel(sigma).unwrap();
            assert_eq!(k.dimensions(), (side, side), "sigma={sigma}");
            let sum: f32 = k.as_slice().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaked() {
        let k = gaussian_kernel(2.0).unwrap();
        let c = k.get(2, 2);
        for (x, y, &v) in k.cells() {
            assert_eq!(v, k.get(4 - x, y));
            assert_eq!(v, k.get(x, 4 - y));
            assert_eq!(v, k.get(y, x));
            assert!(v <= c);
        }
        // exp(-1/2) ratio between centre and a 4-neighbour at sigma 1
        let k1 = gaussian_kernel(1.0).unwrap();
        assert_relative_eq!(k1.get(1, 0) / k1.get(1, 1), (-0.5f32).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_sub_unit_sigma_is_identity() {
        let grid = FloatGrid::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let out = apply_gaussian_smoothing(&grid, 0.6).unwrap();
        assert_eq!(out, grid);
    }

    #[test]
    fn test_constant_interior_preserved_margin_zero() {
        let grid = FloatGrid::from_vec(7, 6, vec![3.0; 42]).unwrap();
        let out = apply_gaussian_smoothing(&grid, 2.0).unwrap();
        assert_eq!(out.dimensions(), (7, 6));
        for (x, y, &v) in out.cells() {
            let inside = (2..5).contains(&x) && (2..4).contains(&y);
            if inside {
                assert_relative_eq!(v, 3.0, epsilon = 1e-5);
            } else {
                assert_eq!(v, 0.0, "margin cell ({x},{y})");
            }
        }
    }

    #[test]
    fn test_impulse_spreads_kernel() {
        let mut grid = FloatGrid::new(5, 5);
        grid.set(2, 2, 1.0);
        let out = apply_gaussian_smoothing(&grid, 1.0).unwrap();
        let k = gaussian_kernel(1.0).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                assert_relative_eq!(out.get(x, y), k.get(x - 1, y - 1), epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_invalid_sigma() {
        let grid = FloatGrid::new(5, 5);
        for sigma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = apply_gaussian_smoothing(&grid, sigma).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_grid_smaller_than_kernel() {
        let grid = FloatGrid::new(4, 9);
        let err = apply_gaussian_smoothing(&grid, 2.0).unwrap_err();
        assert!(matches!(
            err,
            HarrisError::ImageTooSmall { stage: Stage::Smoothing, min_size: 5, .. }
        ));
    }

    #[test]
    fn test_huge_sigma_rejected_before_kernel() {
        let grid = FloatGrid::new(8, 8);
        let err = apply_gaussian_smoothing(&grid, 1.0e9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            err,
            HarrisError::ImageTooSmall { stage: Stage::Smoothing, min_size: 2_000_000_001, .. }
        ));

        // Radius saturates; the side no longer fits in usize.
        let err = apply_gaussian_smoothing(&grid, 1.0e20).unwrap_err();
        assert!(matches!(
            err,
            HarrisError::ImageTooSmall { min_size: usize::MAX, .. }
        ));
    }

    #[test]
    fn test_unrepresentable_kernel() {
        for sigma in [1.0e10f32, 1.0e20] {
            assert_eq!(gaussian_kernel(sigma).unwrap_err(), HarrisError::InvalidSigma(sigma));
        }
    }
}
