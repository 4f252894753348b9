use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use harris_detect::{
    ConfigError, Corner, CornerList, Detection, HarrisConfig, HarrisDetector, HarrisError,
    PixelGrid, ResponseVariant,
};
use image::{GrayImage, ImageReader};
use serde::{Deserialize, Serialize};

pub mod debug;

pub use harris_detect::{self, DetectorBuilder, DetectorConfig};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("detection error: {0}")]
    Harris(#[from] HarrisError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("overlay size mismatch: image {}x{}, mask {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    OverlayMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

pub type CliResult<T> = Result<T, CliError>;

/// Size the global rayon pool; fails if it is already running.
pub fn init_thread_pool(n_threads: usize) -> CliResult<()> {
    harris_detect::init_thread_pool(n_threads)?;
    log::info!("using {} worker threads", rayon::current_num_threads());
    Ok(())
}

/// High-level detector working on decoded `image` buffers
#[derive(Debug, Clone)]
pub struct CornerDetector {
    detector: HarrisDetector,
}

impl CornerDetector {
    /// Create a detector with the given configuration
    pub fn new(cfg: HarrisConfig) -> CliResult<Self> {
        Ok(Self {
            detector: HarrisDetector::new(cfg)?,
        })
    }

    pub fn from_detector(detector: HarrisDetector) -> Self {
        Self { detector }
    }

    /// Load an image from disk and convert it to 8-bit grayscale
    pub fn open_image<P: AsRef<Path>>(path: P) -> CliResult<GrayImage> {
        Ok(ImageReader::open(path)?.decode()?.to_luma8())
    }

    /// Copy a grayscale image into a row-major pixel grid
    pub fn pixel_grid(img: &GrayImage) -> CliResult<PixelGrid> {
        let (w, h) = img.dimensions();
        let grid = PixelGrid::from_vec(w as usize, h as usize, img.as_raw().clone())
            .map_err(HarrisError::from)?;
        Ok(grid)
    }

    /// Run the full pipeline on a grayscale image
    pub fn detect_image(&self, img: &GrayImage) -> CliResult<Detection> {
        let grid = Self::pixel_grid(img)?;
        Ok(self.detector.detect(&grid)?)
    }

    /// Corner coordinates only
    pub fn detect_corners(&self, img: &GrayImage) -> CliResult<CornerList> {
        Ok(self.detect_image(img)?.corners)
    }

    /// Get detector configuration
    pub fn config(&self) -> &HarrisConfig {
        self.detector.config()
    }

    pub fn detector(&self) -> &HarrisDetector {
        &self.detector
    }
}

/// Files written by [`write_debug_images`]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugImagePaths {
    pub magnitude: PathBuf,
    pub response: PathBuf,
    pub candidates: PathBuf,
    pub corners: PathBuf,
}

impl DebugImagePaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            magnitude: dir.join(format!("{stem}_magnitude.png")),
            response: dir.join(format!("{stem}_response.png")),
            candidates: dir.join(format!("{stem}_candidates.png")),
            corners: dir.join(format!("{stem}_corners.png")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            &self.magnitude,
            &self.response,
            &self.candidates,
            &self.corners,
        ]
        .into_iter()
        .map(PathBuf::as_path)
    }
}

/// Save the gradient magnitude and response heat maps plus the candidate and
/// corner overlays as `<stem>_*.png` under `dir`.
pub fn write_debug_images(
    dir: &Path,
    stem: &str,
    base: &GrayImage,
    detection: &Detection,
) -> CliResult<DebugImagePaths> {
    let paths = DebugImagePaths::new(dir, stem);
    debug::heat_map(&detection.gradients.magnitude).save(&paths.magnitude)?;
    debug::heat_map(&detection.response).save(&paths.response)?;
    debug::overlay_mask(base, &detection.candidates)?.save(&paths.candidates)?;
    debug::overlay_corners(base, &detection.corners).save(&paths.corners)?;
    for p in paths.iter() {
        log::info!("wrote {}", p.display());
    }
    Ok(paths)
}

/// JSON record of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerDump {
    pub image: String,
    pub width: usize,
    pub height: usize,
    pub variant: ResponseVariant,
    pub max_response: f32,
    pub max_location: Corner,
    pub corners: CornerList,
}

impl CornerDump {
    pub fn new(image: &str, variant: ResponseVariant, detection: &Detection) -> Self {
        let (width, height) = detection.dimensions();
        Self {
            image: image.to_string(),
            width,
            height,
            variant,
            max_response: detection.summary.max,
            max_location: detection.summary.location,
            corners: detection.corners.clone(),
        }
    }
}

pub fn write_corners_json(path: &Path, dump: &CornerDump) -> CliResult<()> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, dump)?;
    file.write_all(b"\n")?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn square_image() -> GrayImage {
        GrayImage::from_fn(32, 32, |x, y| {
            if (10..22).contains(&x) && (10..22).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    fn detector() -> CornerDetector {
        CornerDetector::new(HarrisConfig {
            variant: ResponseVariant::SmoothedCrossTerm,
            n_threads: 1,
            ..HarrisConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_pixel_grid_is_row_major() {
        let img = GrayImage::from_fn(3, 2, |x, y| Luma([(y * 3 + x) as u8]));
        let grid = CornerDetector::pixel_grid(&img).unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.get(2, 1), 5);
        assert_eq!(grid.get(1, 0), 1);
    }

    #[test]
    fn test_detect_image() {
        let corners = detector().detect_corners(&square_image()).unwrap();
        assert_eq!(corners, vec![Corner::new(9, 9), Corner::new(22, 22)]);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = HarrisConfig {
            k: f32::NAN,
            ..HarrisConfig::default()
        };
        assert!(matches!(
            CornerDetector::new(cfg),
            Err(CliError::Harris(HarrisError::InvalidK(_)))
        ));
    }

    #[test]
    fn test_write_debug_images() {
        let dir = tempfile::tempdir().unwrap();
        let img = square_image();
        let detection = detector().detect_image(&img).unwrap();
        let paths = write_debug_images(dir.path(), "square", &img, &detection).unwrap();
        assert_eq!(paths.corners, dir.path().join("square_corners.png"));
        for p in paths.iter() {
            let written = image::open(p).unwrap();
            assert_eq!((written.width(), written.height()), (32, 32));
        }
    }

    #[test]
    fn test_write_corners_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.json");
        let detection = detector().detect_image(&square_image()).unwrap();
        let dump = CornerDump::new("square.png", ResponseVariant::SmoothedCrossTerm, &detection);
        write_corners_json(&path, &dump).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"smoothed-cross-term\""));
        let back: CornerDump = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dump);
        assert_eq!(back.corners.len(), 2);
    }

    #[test]
    fn test_thread_pool_initializes_once() {
        // Whichever call comes first, the global pool exists afterwards.
        let _ = init_thread_pool(2);
        let err = init_thread_pool(2).unwrap_err();
        assert!(matches!(err, CliError::ThreadPool(_)));
    }

    #[test]
    fn test_open_missing_image() {
        let err = CornerDetector::open_image("/nonexistent/harris.png").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
