use crate::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 2D buffer with explicit dimensions.
///
/// Every derived map of a detection run (gradients, response, masks) is a
/// `Grid` with the exact dimensions of the source image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// 8-bit grayscale intensities
pub type PixelGrid = Grid<u8>;
/// Gradient, orientation and response maps
pub type FloatGrid = Grid<f32>;
/// Candidate and suppressed corner masks
pub type BoolGrid = Grid<bool>;

impl<T: Copy + Default> Grid<T> {
    /// Create a grid filled with `T::default()` (0, 0.0 or false).
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Create a default-filled grid with the same dimensions as `other`.
    pub fn like<U>(other: &Grid<U>) -> Self {
        Self::new(other.width, other.height)
    }
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer, checking that its length matches `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, CoreError> {
        let expected_len = width * height;
        if data.len() != expected_len {
            return Err(CoreError::DataLength {
                width,
                height,
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of column `x`, row `y`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Single row as a slice.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width.max(1))
    }

    /// Iterate `(x, y, &value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % width, i / width, v))
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }
}

impl BoolGrid {
    /// Number of true cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
