//! Stage-ordered detection pipeline.
//!
//! Each stage owns the fully materialized outputs of every stage before it
//! and can only be reached from its predecessor:
//!
//! ```text
//! GradientStage::compute -> score -> ResponseStage -> threshold
//!     -> CandidateStage -> suppress -> Detection
//! ```

use std::time::Instant;

use harris_core::{BoolGrid, FloatGrid, PixelGrid, ResponseSummary};

use crate::error::HarrisResult;
use crate::gradient::compute_gradients;
use crate::response::score_response;
use crate::suppression::suppress;
use crate::threshold::threshold;
use crate::types::{Detection, GradientBundle, ResponseParams};

/// Gradients computed; ready for scoring.
#[derive(Debug, Clone)]
pub struct GradientStage {
    gradients: GradientBundle,
}

impl GradientStage {
    pub fn compute(image: &PixelGrid) -> HarrisResult<Self> {
        let t0 = Instant::now();
        let gradients = compute_gradients(image)?;
        log::debug!(
            "gradients: {}x{} in {:.2?}",
            image.width(),
            image.height(),
            t0.elapsed()
        );
        Ok(Self { gradients })
    }

    pub fn gradients(&self) -> &GradientBundle {
        &self.gradients
    }

    pub fn into_gradients(self) -> GradientBundle {
        self.gradients
    }

    pub fn score(self, params: &ResponseParams) -> HarrisResult<ResponseStage> {
        let t0 = Instant::now();
        let (response, summary) = score_response(&self.gradients, params)?;
        log::debug!(
            "response ({}): max {:.3e} at ({}, {}) in {:.2?}",
            params.variant,
            summary.max,
            summary.location.x,
            summary.location.y,
            t0.elapsed()
        );
        Ok(ResponseStage {
            gradients: self.gradients,
            response,
            summary,
        })
    }
}

/// Response map and its maximum; ready for thresholding.
#[derive(Debug, Clone)]
pub struct ResponseStage {
    gradients: GradientBundle,
    response: FloatGrid,
    summary: ResponseSummary,
}

impl ResponseStage {
    pub fn gradients(&self) -> &GradientBundle {
        &self.gradients
    }

    pub fn response(&self) -> &FloatGrid {
        &self.response
    }

    pub fn summary(&self) -> ResponseSummary {
        self.summary
    }

    pub fn threshold(self, threshold_percent: f32) -> HarrisResult<CandidateStage> {
        let t0 = Instant::now();
        let candidates = threshold(&self.response, self.summary.max, threshold_percent)?;
        log::debug!(
            "threshold {}: {} candidates in {:.2?}",
            threshold_percent,
            candidates.count_true(),
            t0.elapsed()
        );
        Ok(CandidateStage {
            gradients: self.gradients,
            response: self.response,
            summary: self.summary,
            candidates,
        })
    }
}

/// Candidate mask computed; ready for suppression.
#[derive(Debug, Clone)]
pub struct CandidateStage {
    gradients: GradientBundle,
    response: FloatGrid,
    summary: ResponseSummary,
    candidates: BoolGrid,
}

impl CandidateStage {
    pub fn response(&self) -> &FloatGrid {
        &self.response
    }

    pub fn summary(&self) -> ResponseSummary {
        self.summary
    }

    pub fn candidates(&self) -> &BoolGrid {
        &self.candidates
    }

    pub fn suppress(self, window_offset: usize) -> HarrisResult<Detection> {
        let t0 = Instant::now();
        let (corners_mask, corners) = suppress(&self.response, &self.candidates, window_offset)?;
        // The window fitted inside the grid, so this cannot overflow.
        let side = 2 * window_offset + 1;
        log::debug!(
            "suppression (window {side}x{side}): {} corners in {:.2?}",
            corners.len(),
            t0.elapsed()
        );
        Ok(Detection {
            gradients: self.gradients,
            response: self.response,
            summary: self.summary,
            candidates: self.candidates,
            corners_mask,
            corners,
        })
    }
}
