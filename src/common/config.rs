use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::resolver::KeepPolicy;

/// Global tidypc configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum file size considered by duplicate scans, in bytes
    #[serde(default = "default_min_size")]
    pub duplicate_min_size: u64,

    /// Minimum file age before temp cleanup will touch it, in hours
    #[serde(default = "default_min_age_hours")]
    pub temp_min_age_hours: f64,

    /// Which member of a duplicate group is suggested as the keeper
    #[serde(default)]
    pub keep_policy: KeepPolicy,

    /// Paths to exclude from scanning
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_min_size() -> u64 {
    1024
}
fn default_min_age_hours() -> f64 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duplicate_min_size: default_min_size(),
            temp_min_age_hours: default_min_age_hours(),
            keep_policy: KeepPolicy::default(),
            exclude_paths: Vec::new(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the tidypc data directory (~/.tidypc)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".tidypc")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Minimum temp-file age as a duration
    pub fn temp_min_age(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.temp_min_age_hours * 3600.0)
    }
}
