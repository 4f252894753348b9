use harris_core::{HarrisConfig, ResponseVariant};

use crate::builder::DetectorBuilder;
use crate::detector::validate_config;
use crate::error::HarrisResult;

#[cfg(feature = "serde")]
use crate::error::ConfigError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration with optional metadata
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Metadata
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Detection parameters
    #[cfg_attr(feature = "serde", serde(default))]
    pub core: HarrisConfig,
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing parameter set
    pub fn from_core(core: HarrisConfig) -> Self {
        Self {
            name: None,
            description: None,
            core,
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let c = &self.core;
        let side = c.window_offset.saturating_mul(2).saturating_add(1);
        let mut s = format!(
            "DetectorConfig: variant={}, sigma={}, k={}, threshold={}, window={}x{}, threads={}",
            c.variant, c.sigma, c.k, c.threshold_percent, side, side, c.n_threads
        );
        if let Some(name) = &self.name {
            s.push_str(&format!(" [{name}]"));
        }
        s
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> HarrisResult<()> {
        validate_config(&self.core)
    }

    pub fn variant(&self) -> ResponseVariant {
        self.core.variant
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from a `.toml` or `.json` file, picked by extension (JSON otherwise).
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::load_toml(path),
            _ => Self::load_json(path),
        }
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl From<HarrisConfig> for DetectorConfig {
    fn from(core: HarrisConfig) -> Self {
        Self::from_core(core)
    }
}
