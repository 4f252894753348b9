use harris_core::{FloatGrid, PixelGrid};
use rayon::prelude::*;

use crate::error::{ensure_min_size, HarrisResult};
use crate::types::{GradientBundle, Stage};

/// Smallest image the 3x3 Sobel kernels can be applied to
pub const MIN_GRADIENT_SIZE: usize = 3;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Compute Sobel gradients, magnitude and orientation for every interior pixel.
///
/// Rows and columns 0 and n-1 stay at 0.0 in all four maps. Rows are
/// processed in parallel; each output cell only reads its 3x3 neighborhood.
pub fn compute_gradients(image: &PixelGrid) -> HarrisResult<GradientBundle> {
    let (width, height) = image.dimensions();
    ensure_min_size(Stage::Gradients, width, height, MIN_GRADIENT_SIZE)?;

    let mut grad_x = FloatGrid::like(image);
    let mut grad_y = FloatGrid::like(image);
    let mut magnitude = FloatGrid::like(image);
    let mut orientation = FloatGrid::like(image);

    (
        grad_x.as_mut_slice().par_chunks_mut(width),
        grad_y.as_mut_slice().par_chunks_mut(width),
        magnitude.as_mut_slice().par_chunks_mut(width),
        orientation.as_mut_slice().par_chunks_mut(width),
    )
        .into_par_iter()
        .enumerate()
        .filter(|(y, _)| *y >= 1 && *y < height - 1)
        .for_each(|(y, (gx_row, gy_row, mag_row, ori_row))| {
            for x in 1..width - 1 {
                let (sum_x, sum_y) = sobel_at(image, x, y);
                gx_row[x] = sum_x;
                gy_row[x] = sum_y;
                mag_row[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
                ori_row[x] = orientation_of(sum_x, sum_y);
            }
        });

    Ok(GradientBundle {
        grad_x,
        grad_y,
        magnitude,
        orientation,
    })
}

/// Sobel responses at an interior pixel. Sums are integral and exact in f32.
#[inline]
fn sobel_at(image: &PixelGrid, x: usize, y: usize) -> (f32, f32) {
    let mut sum_x = 0i32;
    let mut sum_y = 0i32;
    for (j, (kx_row, ky_row)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
        let row = image.row(y + j - 1);
        for i in 0..3 {
            let p = row[x + i - 1] as i32;
            sum_x += p * kx_row[i];
            sum_y += p * ky_row[i];
        }
    }
    (sum_x as f32, sum_y as f32)
}

/// atan(sum_y / sum_x). A zero denominator is replaced by the smallest
/// positive normal f32, so vertical gradients map to +-pi/2 and a zero
/// gradient maps to 0.
#[inline]
pub(crate) fn orientation_of(sum_x: f32, sum_y: f32) -> f32 {
    let denom = if sum_x != 0.0 { sum_x } else { f32::MIN_POSITIVE };
    (sum_y / denom).atan()
}
