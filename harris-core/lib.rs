mod grid;

pub use grid::{BoolGrid, FloatGrid, Grid, PixelGrid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised while building core values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("grid data length mismatch: expected {expected_len} for {width}x{height}, got {actual_len}")]
    DataLength {
        width: usize,
        height: usize,
        expected_len: usize,
        actual_len: usize,
    },
    #[error("unknown response variant `{0}` (expected `smoothed-cross-term` or `direct-second-moment`)")]
    UnknownVariant(String),
}

/// Integer pixel coordinate, x = column, y = row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corner {
    pub x: usize,
    pub y: usize,
}

impl Corner {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Corner {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Corners in row-major discovery order. Duplicates are kept.
pub type CornerList = Vec<Corner>;

/// Global maximum of a response map and the first location attaining it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseSummary {
    pub max: f32,
    pub location: Corner,
}

impl ResponseSummary {
    /// Empty summary; any finite value replaces it.
    pub const fn empty() -> Self {
        Self {
            max: f32::NEG_INFINITY,
            location: Corner::new(0, 0),
        }
    }

    /// Record `value` at (x, y) if it is strictly greater than the current max.
    #[inline]
    pub fn observe(&mut self, value: f32, x: usize, y: usize) {
        if value > self.max {
            self.max = value;
            self.location = Corner::new(x, y);
        }
    }
}

impl Default for ResponseSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Corner response scoring algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ResponseVariant {
    /// Gaussian-smoothed magnitude and directional cross term
    SmoothedCrossTerm,
    /// Per-pixel second moment terms, no spatial aggregation
    #[default]
    DirectSecondMoment,
}

impl ResponseVariant {
    pub const ALL: [ResponseVariant; 2] = [
        ResponseVariant::SmoothedCrossTerm,
        ResponseVariant::DirectSecondMoment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseVariant::SmoothedCrossTerm => "smoothed-cross-term",
            ResponseVariant::DirectSecondMoment => "direct-second-moment",
        }
    }
}

impl std::fmt::Display for ResponseVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResponseVariant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smoothed-cross-term" | "a" => Ok(ResponseVariant::SmoothedCrossTerm),
            "direct-second-moment" | "b" => Ok(ResponseVariant::DirectSecondMoment),
            _ => Err(CoreError::UnknownVariant(s.to_string())),
        }
    }
}

/// Detection parameters shared by all stages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarrisConfig {
    pub variant: ResponseVariant,
    /// Gaussian standard deviation; kernel side is `2 * floor(sigma) + 1`
    pub sigma: f32,
    /// Harris sensitivity constant, typically 0.04..0.06
    pub k: f32,
    /// Candidate threshold as a fraction of the maximum response
    pub threshold_percent: f32,
    /// Half-size of the suppression window (1 → 3x3)
    pub window_offset: usize,
    pub n_threads: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            variant: ResponseVariant::default(),
            sigma: 1.0,
            k: 0.04,
            threshold_percent: 0.5,
            window_offset: 1,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keeps_first_maximum() {
        let mut s = ResponseSummary::empty();
        s.observe(-3.0, 1, 1);
        assert_eq!(s.max, -3.0);
        s.observe(5.0, 2, 1);
        s.observe(5.0, 3, 1);
        assert_eq!(s.max, 5.0);
        assert_eq!(s.location, Corner::new(2, 1));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("a".parse::<ResponseVariant>(), Ok(ResponseVariant::SmoothedCrossTerm));
        assert_eq!(
            "Direct-Second-Moment".parse::<ResponseVariant>(),
            Ok(ResponseVariant::DirectSecondMoment)
        );
        assert_eq!(
            "sobel".parse::<ResponseVariant>(),
            Err(CoreError::UnknownVariant("sobel".to_string()))
        );
        for v in ResponseVariant::ALL {
            assert_eq!(v.to_string().parse::<ResponseVariant>(), Ok(v));
        }
    }

    #[test]
    fn test_default_config() {
        let cfg = HarrisConfig::default();
        assert_eq!(cfg.variant, ResponseVariant::DirectSecondMoment);
        assert_eq!(cfg.sigma, 1.0);
        assert_eq!(cfg.k, 0.04);
        assert_eq!(cfg.threshold_percent, 0.5);
        assert_eq!(cfg.window_offset, 1);
        assert!(cfg.n_threads >= 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_uses_kebab_case_variant() {
        let cfg = HarrisConfig {
            variant: ResponseVariant::SmoothedCrossTerm,
            ..HarrisConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"smoothed-cross-term\""));
        let back: HarrisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
