use harris_core::CoreError;

use crate::types::Stage;

/// The two failure classes of the detection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Grid too small or mis-shaped for the requested operation
    InvalidInput,
    /// Parameter outside its accepted range
    InvalidParameter,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarrisError {
    #[error("{stage}: image {width}x{height} too small (minimum {min_size}x{min_size})")]
    ImageTooSmall {
        stage: Stage,
        width: usize,
        height: usize,
        min_size: usize,
    },
    #[error("{stage}: grid dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        stage: Stage,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
    #[error("invalid sigma: {0} (must be finite and > 0)")]
    InvalidSigma(f32),
    #[error("invalid Harris constant k: {0} (must be finite)")]
    InvalidK(f32),
    #[error("invalid threshold percent: {0} (must be in (0, 1])")]
    InvalidThresholdPercent(f32),
    #[error("unknown response variant `{0}`")]
    UnknownVariant(String),
}

impl HarrisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarrisError::ImageTooSmall { .. }
            | HarrisError::DimensionMismatch { .. }
            | HarrisError::InvalidImageData { .. } => ErrorKind::InvalidInput,
            HarrisError::InvalidSigma(_)
            | HarrisError::InvalidK(_)
            | HarrisError::InvalidThresholdPercent(_)
            | HarrisError::UnknownVariant(_) => ErrorKind::InvalidParameter,
        }
    }
}

impl From<CoreError> for HarrisError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DataLength {
                expected_len,
                actual_len,
                ..
            } => HarrisError::InvalidImageData {
                expected_len,
                actual_len,
            },
            CoreError::UnknownVariant(tag) => HarrisError::UnknownVariant(tag),
        }
    }
}

pub type HarrisResult<T> = Result<T, HarrisError>;

/// Errors from loading or saving a `DetectorConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[cfg(feature = "serde")]
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] HarrisError),
}

/// Check that a grid is at least `min_size` in both dimensions.
pub(crate) fn ensure_min_size(
    stage: Stage,
    width: usize,
    height: usize,
    min_size: usize,
) -> HarrisResult<()> {
    if width < min_size || height < min_size {
        return Err(HarrisError::ImageTooSmall {
            stage,
            width,
            height,
            min_size,
        });
    }
    Ok(())
}

/// Side of a square window with the given half-size, `None` on overflow.
#[inline]
pub fn window_side(half: usize) -> Option<usize> {
    half.checked_mul(2)?.checked_add(1)
}

/// Check that a `2 * half + 1` square window fits inside the grid.
///
/// A side too large for `usize` can never fit and is reported with
/// `min_size = usize::MAX`.
pub(crate) fn ensure_window_fits(
    stage: Stage,
    width: usize,
    height: usize,
    half: usize,
) -> HarrisResult<()> {
    ensure_min_size(stage, width, height, window_side(half).unwrap_or(usize::MAX))
}

pub(crate) fn ensure_same_shape(
    stage: Stage,
    expected: (usize, usize),
    actual: (usize, usize),
) -> HarrisResult<()> {
    if expected != actual {
        return Err(HarrisError::DimensionMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}
