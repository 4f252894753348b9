use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use harris_cli::{
    init_thread_pool, write_corners_json, write_debug_images, CornerDetector, CornerDump,
};
use harris_detect::{DetectorConfig, HarrisConfig, ResponseVariant};
use log::LevelFilter;

/// Harris-style corner detection on grayscale images.
#[derive(Parser, Debug)]
#[command(name = "harris", version, about)]
struct Cli {
    /// Input image, any format the `image` crate decodes
    image: PathBuf,

    /// JSON or TOML detector config; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Response variant: smoothed-cross-term (a) or direct-second-moment (b)
    #[arg(long)]
    variant: Option<ResponseVariant>,

    /// Gaussian standard deviation
    #[arg(long)]
    sigma: Option<f32>,

    /// Harris sensitivity constant
    #[arg(short, long)]
    k: Option<f32>,

    /// Candidate threshold as a fraction of the maximum response, in (0, 1]
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Suppression window half-size
    #[arg(short, long)]
    window: Option<usize>,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Directory for debug images and JSON output
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write heat maps and overlays
    #[arg(long)]
    debug_images: bool,

    /// Write detected corners as JSON
    #[arg(long)]
    json: bool,

    /// Print every corner as `x y`
    #[arg(long)]
    list: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply_overrides(&self, cfg: &mut HarrisConfig) {
        if let Some(v) = self.variant {
            cfg.variant = v;
        }
        if let Some(s) = self.sigma {
            cfg.sigma = s;
        }
        if let Some(k) = self.k {
            cfg.k = k;
        }
        if let Some(t) = self.threshold {
            cfg.threshold_percent = t;
        }
        if let Some(w) = self.window {
            cfg.window_offset = w;
        }
        if let Some(n) = self.threads {
            cfg.n_threads = n;
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DetectorConfig::new(),
    };
    cli.apply_overrides(&mut config.core);
    config.validate().context("invalid detector parameters")?;
    log::info!("{}", config.summary());

    init_thread_pool(config.core.n_threads).context("initializing thread pool")?;
    let detector = CornerDetector::new(config.core.clone())?;

    let image = CornerDetector::open_image(&cli.image)
        .with_context(|| format!("opening image {}", cli.image.display()))?;
    let (w, h) = image.dimensions();

    let t0 = Instant::now();
    let detection = detector
        .detect_image(&image)
        .with_context(|| format!("detecting corners in {}", cli.image.display()))?;
    let elapsed = t0.elapsed();

    println!("Image: {}x{}", w, h);
    println!("Time taken: {:.2?}", elapsed);
    println!(
        "Max response {:.6e} at ({}, {})",
        detection.summary.max, detection.summary.location.x, detection.summary.location.y
    );
    println!("Candidates: {}", detection.candidates.count_true());
    println!("Detected {} corners", detection.corners.len());
    if cli.list {
        for c in &detection.corners {
            println!("{} {}", c.x, c.y);
        }
    }

    let stem = cli
        .image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    if cli.debug_images || cli.json {
        std::fs::create_dir_all(&cli.output_dir)
            .with_context(|| format!("creating {}", cli.output_dir.display()))?;
    }
    if cli.debug_images {
        let paths = write_debug_images(&cli.output_dir, &stem, &image, &detection)?;
        println!("Saved debug images, e.g. {}", paths.corners.display());
    }
    if cli.json {
        let path = cli.output_dir.join(format!("{stem}_corners.json"));
        let dump = CornerDump::new(
            &cli.image.to_string_lossy(),
            config.core.variant,
            &detection,
        );
        write_corners_json(&path, &dump)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}
