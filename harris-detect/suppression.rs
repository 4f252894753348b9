use harris_core::{BoolGrid, Corner, CornerList, FloatGrid};
use rayon::prelude::*;

use crate::error::{ensure_same_shape, ensure_window_fits, HarrisResult};
use crate::types::Stage;

/// Non-maximal suppression over a `(2 * window_offset + 1)` square window.
///
/// A candidate at least `window_offset` away from every edge survives when
/// its response equals the window maximum exactly. The running maximum
/// starts at 0.0, so a window of only negative responses never yields a
/// corner. Adjacent cells sharing a maximal value are all kept.
///
/// Corners are returned in row-major scan order.
pub fn suppress(
    response: &FloatGrid,
    candidates: &BoolGrid,
    window_offset: usize,
) -> HarrisResult<(BoolGrid, CornerList)> {
    let (width, height) = response.dimensions();
    ensure_same_shape(Stage::Suppression, (width, height), candidates.dimensions())?;
    ensure_window_fits(Stage::Suppression, width, height, window_offset)?;

    // Rows are independent; collecting keeps them in order.
    let survivors: Vec<Vec<usize>> = (window_offset..height - window_offset)
        .into_par_iter()
        .map(|y| {
            let mask = candidates.row(y);
            (window_offset..width - window_offset)
                .filter(|&x| mask[x] && is_window_max(response, x, y, window_offset))
                .collect()
        })
        .collect();

    let mut corners_mask = BoolGrid::like(response);
    let mut corners = CornerList::new();
    for (row, xs) in survivors.into_iter().enumerate() {
        let y = row + window_offset;
        for x in xs {
            corners_mask.set(x, y, true);
            corners.push(Corner::new(x, y));
        }
    }

    Ok((corners_mask, corners))
}

#[inline]
fn is_window_max(response: &FloatGrid, x: usize, y: usize, window_offset: usize) -> bool {
    let mut window_max = 0.0f32;
    for yy in y - window_offset..=y + window_offset {
        let row = response.row(yy);
        for &r in &row[x - window_offset..=x + window_offset] {
            if r > window_max {
                window_max = r;
            }
        }
    }
    response.get(x, y) == window_max
}
