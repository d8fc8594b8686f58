//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration, read from `~/.config/hpactl/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default project id label for `derive`
    pub project_id: Option<String>,
    /// Default location label for `derive`
    pub cluster_location: Option<String>,
    /// Default cluster name label for `derive`
    pub cluster_name: Option<String>,
    pub cpu_metric_type: Option<String>,
    pub memory_metric_type: Option<String>,
}

impl Config {
    /// Load configuration from the default location, or defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        serde_json::from_str(&content).context("Failed to parse config file")
    }

    /// Get the configuration file path
    fn config_path() -> Option<PathBuf> {
        let home = dirs_next::home_dir()?;
        Some(home.join(".config").join("hpactl").join("config.json"))
    }
}
