use std::time::Instant;

use harris_cli::{debug, CornerDetector, DetectorBuilder};
use harris_detect::ResponseVariant;
use image::{GrayImage, Luma};

/// Bright squares on a dark background, or the image given as first argument
fn load_image() -> Result<GrayImage, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(CornerDetector::open_image(path)?),
        None => Ok(GrayImage::from_fn(256, 256, |x, y| {
            let inside = (x / 32) % 2 == 1 && (y / 32) % 2 == 1 && x % 32 > 6 && y % 32 > 6;
            Luma([if inside { 220 } else { 30 }])
        })),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎯 Harris DetectorBuilder API Demo");
    println!("==================================\n");

    let img = load_image()?;
    let (w, h) = img.dimensions();
    println!("📷 Processing image: {}x{}", w, h);

    println!("\n🚀 Demo 1: Direct second moment (defaults)");
    run_detection_demo(DetectorBuilder::new(), &img, "direct")?;

    println!("\n✨ Demo 2: Smoothed cross term");
    run_detection_demo(
        DetectorBuilder::new()
            .variant(ResponseVariant::SmoothedCrossTerm)
            .sigma(1.0),
        &img,
        "smoothed",
    )?;

    println!("\n⚙️  Demo 3: Wide smoothing, larger suppression window");
    run_detection_demo(
        DetectorBuilder::new()
            .variant(ResponseVariant::SmoothedCrossTerm)
            .sigma(2.5)
            .k(0.06)
            .threshold_percent(0.3)
            .window_offset(3),
        &img,
        "wide",
    )?;

    println!("\n🎉 All demos completed successfully!");
    println!("Check the generated images: harris_corners_*.png");
    Ok(())
}

fn run_detection_demo(
    builder: DetectorBuilder,
    img: &GrayImage,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("   Config: {}", builder.summary());
    let detector = CornerDetector::from_detector(builder.build()?);

    let start = Instant::now();
    let detection = detector.detect_image(img)?;
    let elapsed = start.elapsed();

    println!("   ⏱️  Time: {:.2?}", elapsed);
    println!(
        "   📈 Max response {:.3e} at ({}, {})",
        detection.summary.max, detection.summary.location.x, detection.summary.location.y
    );
    println!(
        "   🎯 {} candidates, {} corners",
        detection.candidates.count_true(),
        detection.corners.len()
    );

    let filename = format!("harris_corners_{}.png", name);
    match debug::overlay_corners(img, &detection.corners).save(&filename) {
        Ok(()) => println!("   💾 Saved: {}", filename),
        Err(e) => println!("   ⚠️  Warning: Failed to save visualization: {}", e),
    }
    Ok(())
}
