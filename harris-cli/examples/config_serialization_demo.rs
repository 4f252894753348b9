use harris_cli::DetectorConfig;
use harris_detect::ResponseVariant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 Harris Configuration Serialization Demo");
    println!("===========================================\n");

    println!("📋 Demo 1: Creating Configurations");
    let direct = DetectorConfig::new().with_metadata("Direct", "Per-pixel second moment response");
    let smoothed = DetectorConfig::new()
        .to_builder()
        .variant(ResponseVariant::SmoothedCrossTerm)
        .sigma(2.0)
        .window_offset(2)
        .to_config()
        .with_metadata("Smoothed", "Gaussian-smoothed cross term, wider window");
    println!("   • {}", direct.summary());
    println!("   • {}", smoothed.summary());

    let dir = std::env::temp_dir().join("harris_config_demo");
    std::fs::create_dir_all(&dir)?;

    println!("\n📄 Demo 2: JSON Serialization");
    let json = smoothed.to_json()?;
    println!("{}", json);
    direct.save_json(dir.join("direct.json"))?;
    smoothed.save_json(dir.join("smoothed.json"))?;

    println!("\n📋 Demo 3: TOML Serialization");
    println!("{}", smoothed.to_toml()?);
    direct.save_toml(dir.join("direct.toml"))?;
    smoothed.save_toml(dir.join("smoothed.toml"))?;
    println!("   ✅ Saved configuration files to {}", dir.display());

    println!("\n🔍 Demo 4: Loading and Validation");
    let from_json = DetectorConfig::load(dir.join("smoothed.json"))?;
    let from_toml = DetectorConfig::load(dir.join("smoothed.toml"))?;
    assert_eq!(from_json, from_toml);
    println!("   • From JSON: {}", from_json.summary());
    println!("   • From TOML: {}", from_toml.summary());

    match DetectorConfig::from_json(r#"{"core": {"sigma": -1.0}}"#) {
        Ok(_) => println!("   ⚠️  Invalid config accepted"),
        Err(e) => println!("   ✅ Rejected invalid config: {}", e),
    }

    Ok(())
}
