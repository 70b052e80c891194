//! Configuration for PawBox
//!
//! Supports JSON and TOML files; the default location is
//! `<platform config dir>/pawbox/config.toml`.
//!
//! Configuration is organized into sections:
//! - Layout (canvas margin and panel spacing)
//! - Generator defaults (thickness, box style, output format)
//! - Estimator (method, reference size, timeout, accepted photos)
//! - Output (directory, unique file names)

pub use pawbox_camtools::{BoxStyle, LayoutSettings, OutputFormat};
pub use pawbox_estimator::EstimateMethod;

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "pawbox";
const CONFIG_FILE: &str = "config.toml";

/// Flat-pattern defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Material thickness in mm
    pub thickness: f64,
    pub style: BoxStyle,
    pub format: OutputFormat,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            thickness: 3.0,
            style: BoxStyle::Closed,
            format: OutputFormat::Svg,
        }
    }
}

/// Photo estimation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    pub method: EstimateMethod,
    /// Real length (mm) of the subject's long side, when known
    pub reference_size: Option<f64>,
    /// Upper bound on one estimate in milliseconds
    pub timeout_ms: u64,
    /// Largest accepted photo in bytes
    pub max_image_bytes: u64,
    /// Accepted photo extensions, lowercase without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            method: EstimateMethod::Auto,
            reference_size: None,
            timeout_ms: 30_000,
            max_image_bytes: 16 * 1024 * 1024,
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl EstimatorSettings {
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.allowed_extensions.iter().any(|a| *a == e))
    }
}

/// Where generated patterns are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    /// Prefix file names with a random UUID instead of overwriting
    pub unique_names: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("outputs"),
            unique_names: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutSettings,
    pub generator: GeneratorSettings,
    pub estimator: EstimatorSettings,
    pub output: OutputSettings,
}

impl Config {
    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path)?.as_str() {
            "json" => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path)?.as_str() {
            "json" => serde_json::to_string_pretty(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` when given, else the default file if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            _ => Ok(Self::default()),
        }
    }

    /// `<platform config dir>/pawbox/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.layout
            .validate()
            .map_err(|e| SettingsError::invalid("layout", e.to_string()))?;

        let t = self.generator.thickness;
        if !(t.is_finite() && t > 0.0) {
            return Err(SettingsError::invalid(
                "generator.thickness",
                format!("must be a positive length, got {}", t),
            ));
        }
        if t >= self.layout.spacing {
            return Err(SettingsError::invalid(
                "generator.thickness",
                format!("must be less than layout.spacing ({})", self.layout.spacing),
            ));
        }

        if let Some(size) = self.estimator.reference_size {
            if !(size.is_finite() && size > 0.0) {
                return Err(SettingsError::invalid(
                    "estimator.reference_size",
                    "must be a positive length",
                ));
            }
        }
        if self.estimator.timeout_ms == 0 {
            return Err(SettingsError::invalid("estimator.timeout_ms", "must be > 0"));
        }
        if self.estimator.max_image_bytes == 0 {
            return Err(SettingsError::invalid(
                "estimator.max_image_bytes",
                "must be > 0",
            ));
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(SettingsError::invalid("output.directory", "must not be empty"));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> SettingsResult<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok("json".to_string()),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok("toml".to_string()),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
