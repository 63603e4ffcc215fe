//! Configuration loading from TOML files
//!
//! Config file is selected via `--config <path>` (default: config/dev.toml).
//! Every section is optional; missing values fall back to the standard
//! 208 l barrel in linear mode.

use crate::domain::profile::{BarrelProfile, FormulaMode};
use crate::services::history::DEFAULT_HISTORY_KEY;
use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct BarrelConfig {
    #[serde(default = "default_barrel_name")]
    pub name: String,
    #[serde(default = "default_radius_cm")]
    pub radius_cm: f64,
    #[serde(default = "default_max_height_cm")]
    pub max_height_cm: f64,
    #[serde(default = "default_capacity_liters")]
    pub capacity_liters: f64,
}

fn default_barrel_name() -> String {
    BarrelProfile::standard_208().name
}

fn default_radius_cm() -> f64 {
    BarrelProfile::standard_208().radius_cm
}

fn default_max_height_cm() -> f64 {
    BarrelProfile::standard_208().max_height_cm
}

fn default_capacity_liters() -> f64 {
    BarrelProfile::standard_208().capacity_liters
}

impl Default for BarrelConfig {
    fn default() -> Self {
        Self {
            name: default_barrel_name(),
            radius_cm: default_radius_cm(),
            max_height_cm: default_max_height_cm(),
            capacity_liters: default_capacity_liters(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub mode: FormulaMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding persisted history blobs
    #[serde(default = "default_storage_dir")]
    pub dir: String,
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Maximum blob size in bytes (0 to disable)
    #[serde(default = "default_storage_max_bytes")]
    pub max_bytes: u64,
}

fn default_storage_dir() -> String {
    "data".to_string()
}

fn default_storage_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

fn default_storage_max_bytes() -> u64 {
    5 * 1024 * 1024 // browser local storage quota
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
            max_bytes: default_storage_max_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
    /// UTC offset for displayed dates (e.g. "+03:00"); system local offset if unset
    #[serde(default)]
    pub utc_offset: Option<String>,
}

fn default_export_dir() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { dir: default_export_dir(), utc_offset: None }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub barrel: BarrelConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    profile: BarrelProfile,
    mode: FormulaMode,
    storage_dir: String,
    storage_key: String,
    storage_max_bytes: u64,
    export_dir: String,
    display_offset: Option<FixedOffset>,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: BarrelProfile::standard_208(),
            mode: FormulaMode::Linear,
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            storage_max_bytes: default_storage_max_bytes(),
            export_dir: default_export_dir(),
            display_offset: None,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml_str(&content, &path.display().to_string())
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse and validate TOML content. `source` is recorded as the config file name.
    pub fn from_toml_str(content: &str, source: &str) -> anyhow::Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;

        let profile = BarrelProfile {
            name: toml_config.barrel.name,
            radius_cm: toml_config.barrel.radius_cm,
            max_height_cm: toml_config.barrel.max_height_cm,
            capacity_liters: toml_config.barrel.capacity_liters,
        };
        if let Some(field) = profile.invalid_field() {
            anyhow::bail!("barrel.{} must be a positive number", field);
        }

        anyhow::ensure!(!toml_config.storage.key.is_empty(), "storage.key must not be empty");

        let display_offset = match toml_config.export.utc_offset.as_deref() {
            Some(raw) => Some(
                raw.parse::<FixedOffset>()
                    .with_context(|| format!("Invalid export.utc_offset {:?}", raw))?,
            ),
            None => None,
        };

        Ok(Self {
            profile,
            mode: toml_config.calculator.mode,
            storage_dir: toml_config.storage.dir,
            storage_key: toml_config.storage.key,
            storage_max_bytes: toml_config.storage.max_bytes,
            export_dir: toml_config.export.dir,
            display_offset,
            config_file: source.to_string(),
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn profile(&self) -> &BarrelProfile {
        &self.profile
    }

    pub fn mode(&self) -> FormulaMode {
        self.mode
    }

    pub fn storage_dir(&self) -> &str {
        &self.storage_dir
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Quota for the persisted blob, `None` when disabled
    pub fn storage_max_bytes(&self) -> Option<u64> {
        (self.storage_max_bytes > 0).then_some(self.storage_max_bytes)
    }

    pub fn export_dir(&self) -> &str {
        &self.export_dir
    }

    pub fn display_offset(&self) -> Option<FixedOffset> {
        self.display_offset
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override the formula mode
    pub fn with_mode(mut self, mode: FormulaMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder method to override the storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<String>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}
