use harris_core::{HarrisConfig, ResponseVariant};

use crate::config::DetectorConfig;
use crate::detector::HarrisDetector;
use crate::error::HarrisResult;

/// Builder for creating a `HarrisDetector`
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: HarrisConfig,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the response algorithm
    pub fn variant(mut self, variant: ResponseVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Set the Gaussian standard deviation (smoothed cross-term only)
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Set the Harris sensitivity constant
    pub fn k(mut self, k: f32) -> Self {
        self.config.k = k;
        self
    }

    /// Set the candidate threshold as a fraction of the maximum response
    pub fn threshold_percent(mut self, threshold_percent: f32) -> Self {
        self.config.threshold_percent = threshold_percent;
        self
    }

    /// Set the half-size of the suppression window
    pub fn window_offset(mut self, window_offset: usize) -> Self {
        self.config.window_offset = window_offset;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Create builder from existing configuration
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            config: config.core,
        }
    }

    pub fn config(&self) -> &HarrisConfig {
        &self.config
    }

    /// Convert to DetectorConfig
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig::from_core(self.config)
    }

    /// Build the detector, validating every parameter
    pub fn build(self) -> HarrisResult<HarrisDetector> {
        HarrisDetector::new(self.config)
    }

    /// Generate summary of current configuration
    pub fn summary(&self) -> String {
        format!(
            "DetectorBuilder: variant={}, sigma={}, k={}, threshold={}, window_offset={}, threads={}",
            self.config.variant,
            self.config.sigma,
            self.config.k,
            self.config.threshold_percent,
            self.config.window_offset,
            self.config.n_threads
        )
    }
}
