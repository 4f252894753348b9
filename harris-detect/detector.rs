use std::time::Instant;

use harris_core::{CornerList, HarrisConfig, PixelGrid};

use crate::error::HarrisResult;
use crate::pipeline::GradientStage;
use crate::response::validate_params;
use crate::threshold::validate_threshold_percent;
use crate::types::{Detection, ResponseParams};

/// Check every parameter of a configuration before any stage runs.
pub fn validate_config(cfg: &HarrisConfig) -> HarrisResult<()> {
    validate_params(&response_params(cfg))?;
    validate_threshold_percent(cfg.threshold_percent)?;
    Ok(())
}

fn response_params(cfg: &HarrisConfig) -> ResponseParams {
    ResponseParams::new(cfg.variant, cfg.sigma, cfg.k, cfg.window_offset)
}

/// Harris-style corner detector running the full stage sequence.
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    cfg: HarrisConfig,
}

impl HarrisDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: HarrisConfig) -> HarrisResult<Self> {
        validate_config(&cfg)?;
        Ok(Self { cfg })
    }

    /// Run gradients, scoring, thresholding and suppression on `image`.
    pub fn detect(&self, image: &PixelGrid) -> HarrisResult<Detection> {
        let t0 = Instant::now();
        let detection = GradientStage::compute(image)?
            .score(&self.response_params())?
            .threshold(self.cfg.threshold_percent)?
            .suppress(self.cfg.window_offset)?;
        log::debug!(
            "detected {} corners in {}x{} image ({}) in {:.2?}",
            detection.corners.len(),
            image.width(),
            image.height(),
            self.cfg.variant,
            t0.elapsed()
        );
        Ok(detection)
    }

    /// Detect on a raw row-major buffer.
    pub fn detect_raw(&self, data: &[u8], width: usize, height: usize) -> HarrisResult<Detection> {
        let image = PixelGrid::from_vec(width, height, data.to_vec())?;
        self.detect(&image)
    }

    /// Corner coordinates only.
    pub fn detect_corners(&self, image: &PixelGrid) -> HarrisResult<CornerList> {
        Ok(self.detect(image)?.corners)
    }

    pub fn response_params(&self) -> ResponseParams {
        response_params(&self.cfg)
    }

    /// Get detector configuration
    pub fn config(&self) -> &HarrisConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, HarrisError};
    use harris_core::{Corner, ResponseVariant};

    fn test_config(variant: ResponseVariant) -> HarrisConfig {
        HarrisConfig {
            variant,
            n_threads: 1,
            ..HarrisConfig::default()
        }
    }

    fn bright_square(size: usize, origin: usize, side: usize) -> PixelGrid {
        let mut img = PixelGrid::new(size, size);
        for y in origin..origin + side {
            for x in origin..origin + side {
                img.set(x, y, 255);
            }
        }
        img
    }

    #[test]
    fn test_valid_constructor() {
        assert!(HarrisDetector::new(HarrisConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut cfg = test_config(ResponseVariant::SmoothedCrossTerm);
        cfg.sigma = -1.0;
        assert_eq!(
            HarrisDetector::new(cfg.clone()).unwrap_err(),
            HarrisError::InvalidSigma(-1.0)
        );

        cfg.sigma = 1.0;
        cfg.threshold_percent = 1.2;
        let err = HarrisDetector::new(cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_flat_image_has_no_positive_corners() {
        let img = PixelGrid::from_vec(12, 12, vec![90; 144]).unwrap();
        for variant in ResponseVariant::ALL {
            let det = HarrisDetector::new(test_config(variant)).unwrap();
            let detection = det.detect(&img).unwrap();
            // A flat response is all zeros: max 0.0, nothing strictly above it.
            assert_eq!(detection.summary.max, 0.0);
            assert_eq!(detection.candidates.count_true(), 0);
            assert!(detection.corners.is_empty());
        }
    }

    #[test]
    fn test_square_smoothed_variant_finds_diagonal_corners() {
        let img = bright_square(32, 10, 12);
        let det = HarrisDetector::new(test_config(ResponseVariant::SmoothedCrossTerm)).unwrap();
        let detection = det.detect(&img).unwrap();
        // The cross term is positive only where gx and gy share a sign, so
        // the top-right and bottom-left corners score negative.
        assert_eq!(detection.corners, vec![Corner::new(9, 9), Corner::new(22, 22)]);
        assert!(detection.summary.max > 0.0);
    }

    #[test]
    fn test_square_direct_variant_has_no_positive_response() {
        let img = bright_square(32, 10, 12);
        let det = HarrisDetector::new(test_config(ResponseVariant::DirectSecondMoment)).unwrap();
        let detection = det.detect(&img).unwrap();
        assert_eq!(detection.summary.max, 0.0);
        assert!(detection.corners.is_empty());
    }

    #[test]
    fn test_detect_raw_checks_length() {
        let det = HarrisDetector::new(HarrisConfig::default()).unwrap();
        let err = det.detect_raw(&[0u8; 10], 4, 4).unwrap_err();
        assert_eq!(
            err,
            HarrisError::InvalidImageData {
                expected_len: 16,
                actual_len: 10
            }
        );
        assert!(det.detect_raw(&[0u8; 16], 4, 4).is_ok());
    }

    #[test]
    fn test_too_small_image() {
        let det = HarrisDetector::new(HarrisConfig::default()).unwrap();
        let err = det.detect(&PixelGrid::new(2, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_oversized_parameters_fail_at_detection() {
        let img = PixelGrid::new(8, 8);

        let mut cfg = test_config(ResponseVariant::SmoothedCrossTerm);
        cfg.sigma = 1.0e20;
        let det = HarrisDetector::new(cfg).unwrap();
        let err = det.detect(&img).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let mut cfg = test_config(ResponseVariant::DirectSecondMoment);
        cfg.window_offset = usize::MAX / 2 + 1;
        let det = HarrisDetector::new(cfg).unwrap();
        let err = det.detect(&img).unwrap_err();
        assert!(matches!(
            err,
            HarrisError::ImageTooSmall { min_size: usize::MAX, .. }
        ));
    }

    #[test]
    fn test_repeated_detection_is_identical() {
        let img = bright_square(40, 7, 20);
        let det = HarrisDetector::new(test_config(ResponseVariant::SmoothedCrossTerm)).unwrap();
        let first = det.detect_corners(&img).unwrap();
        for _ in 0..5 {
            assert_eq!(det.detect_corners(&img).unwrap(), first);
        }
    }
}
