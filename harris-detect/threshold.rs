use harris_core::{BoolGrid, FloatGrid};
use rayon::prelude::*;

use crate::error::{HarrisError, HarrisResult};

pub(crate) fn validate_threshold_percent(threshold_percent: f32) -> HarrisResult<()> {
    // NaN fails both comparisons
    if !(threshold_percent > 0.0 && threshold_percent <= 1.0) {
        return Err(HarrisError::InvalidThresholdPercent(threshold_percent));
    }
    Ok(())
}

/// Mark every cell whose response is strictly above `threshold_percent * max`.
///
/// The whole grid is scanned, borders included. Zero-valued borders only
/// pass when `max` is negative.
pub fn threshold(response: &FloatGrid, max: f32, threshold_percent: f32) -> HarrisResult<BoolGrid> {
    validate_threshold_percent(threshold_percent)?;
    let cutoff = threshold_percent * max;
    let (width, height) = response.dimensions();
    let mask: Vec<bool> = response
        .as_slice()
        .par_iter()
        .map(|&r| r > cutoff)
        .collect();
    Ok(BoolGrid::from_vec(width, height, mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ramp(width: usize, height: usize) -> FloatGrid {
        let data = (0..width * height).map(|i| i as f32).collect();
        FloatGrid::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn test_strictly_above_cutoff() {
        let response = ramp(4, 4); // 0..15
        let mask = threshold(&response, 10.0, 0.5).unwrap();
        assert_eq!(mask.dimensions(), (4, 4));
        for (x, y, &m) in mask.cells() {
            assert_eq!(m, response.get(x, y) > 5.0);
        }
        assert!(!mask.get(1, 1)); // exactly 5.0
        assert_eq!(mask.count_true(), 10);
    }

    #[test]
    fn test_full_percent_excludes_the_maximum_itself() {
        let mut response = FloatGrid::new(5, 5);
        response.set(2, 2, 9.0);
        response.set(3, 2, 9.0);
        response.set(1, 3, 4.0);
        let mask = threshold(&response, 9.0, 1.0).unwrap();
        assert_eq!(mask.count_true(), 0);
    }

    #[test]
    fn test_negative_max_marks_zero_borders() {
        let mut response = FloatGrid::new(4, 4);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            response.set(x, y, -8.0);
        }
        let mask = threshold(&response, -2.0, 0.5).unwrap();
        // cutoff is -1.0: every zero-valued border cell passes, the interior does not
        for (x, y, &m) in mask.cells() {
            let border = x == 0 || y == 0 || x == 3 || y == 3;
            assert_eq!(m, border, "({x},{y})");
        }
    }

    #[test]
    fn test_invalid_percent() {
        let response = ramp(3, 3);
        for p in [0.0, -0.5, 1.5, f32::NAN] {
            let err = threshold(&response, 8.0, p).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }
}
