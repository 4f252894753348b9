use harris_core::{BoolGrid, CornerList, FloatGrid, ResponseSummary, ResponseVariant};

/// Pipeline stage, used to label errors and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Gradients,
    Smoothing,
    Response,
    Suppression,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Gradients => "gradients",
            Stage::Smoothing => "smoothing",
            Stage::Response => "response",
            Stage::Suppression => "suppression",
        };
        f.write_str(name)
    }
}

/// Sobel gradient maps, all with the source image dimensions.
/// The one-pixel border is left at 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBundle {
    pub grad_x: FloatGrid,
    pub grad_y: FloatGrid,
    pub magnitude: FloatGrid,
    /// atan(gy / gx) in radians, within [-pi/2, pi/2]
    pub orientation: FloatGrid,
}

impl GradientBundle {
    /// (width, height) of every map in the bundle
    pub fn dimensions(&self) -> (usize, usize) {
        self.magnitude.dimensions()
    }
}

/// Parameters of the response stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseParams {
    pub variant: ResponseVariant,
    pub sigma: f32,
    pub k: f32,
    /// Carried with the parameter set; neither formula reads it.
    pub window_offset: usize,
}

impl ResponseParams {
    pub fn new(variant: ResponseVariant, sigma: f32, k: f32, window_offset: usize) -> Self {
        Self {
            variant,
            sigma,
            k,
            window_offset,
        }
    }
}

impl Default for ResponseParams {
    fn default() -> Self {
        Self::new(ResponseVariant::default(), 1.0, 0.04, 1)
    }
}

/// Every intermediate and final output of one detection run
#[derive(Debug, Clone)]
pub struct Detection {
    pub gradients: GradientBundle,
    pub response: FloatGrid,
    pub summary: ResponseSummary,
    /// Cells above the threshold
    pub candidates: BoolGrid,
    /// Cells surviving non-maximal suppression
    pub corners_mask: BoolGrid,
    pub corners: CornerList,
}

impl Detection {
    pub fn dimensions(&self) -> (usize, usize) {
        self.response.dimensions()
    }
}
