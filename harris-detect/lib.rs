//! Harris-style corner detection on 8-bit grayscale grids.
//!
//! ```text
//! image -> compute_gradients -> score_response -> threshold -> suppress -> corners
//! ```
//!
//! Every stage reads only the fully materialized output of the previous one.
//! [`HarrisDetector`] runs the whole sequence; the stage functions and the
//! typestate [`pipeline`] are public for callers that need intermediates.

pub mod builder;
pub mod config;
pub mod detector;
pub mod error;
pub mod gradient;
pub mod pipeline;
pub mod response;
pub mod smoothing;
pub mod suppression;
pub mod threshold;
pub mod types;

pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use detector::{validate_config, HarrisDetector};
pub use error::{ConfigError, ErrorKind, HarrisError, HarrisResult};
pub use gradient::compute_gradients;
pub use pipeline::{CandidateStage, GradientStage, ResponseStage};
pub use response::{score_response, summarize};
pub use smoothing::{apply_gaussian_smoothing, gaussian_kernel};
pub use suppression::suppress;
pub use threshold::threshold;
pub use types::{Detection, GradientBundle, ResponseParams, Stage};

pub use harris_core::{
    init_thread_pool, BoolGrid, Corner, CornerList, FloatGrid, Grid, HarrisConfig, PixelGrid,
    ResponseSummary, ResponseVariant,
};
