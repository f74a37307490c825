//! Application configuration, read from a TOML file.
//!
//! A missing or unreadable file falls back to defaults; command-line flags
//! are applied on top by `main`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tacmap_sim::EngineConfig;

pub const CONFIG_FILE: &str = "tacmap.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub run: RunConfig,
    pub display: DisplayConfig,
}

/// Host loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Wall-clock period of the host loop.
    pub frame_ms: u64,
    /// Simulation milliseconds per wall-clock millisecond.
    pub time_scale: f64,
    /// Stop after this much simulation time. Runs until input closes otherwise.
    pub duration_ms: Option<u64>,
    /// Scenario JSON. The built-in demo is used when unset.
    pub seed_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_ms: 100,
            time_scale: 1.0,
            duration_ms: None,
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Stream an ASCII rendering of the grid with each snapshot.
    pub grid: bool,
    pub grid_cols: usize,
    pub grid_rows: usize,
    /// Padding around the scenario when fitting the grid, in degrees.
    pub margin_deg: f64,
    pub show_coordinates: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            grid: false,
            grid_cols: 48,
            grid_rows: 16,
            margin_deg: 0.002,
            show_coordinates: false,
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

pub fn load_config(path: &Path) -> AppConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match parse_config(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    warn!("Failed to parse config: {}, using defaults", e);
                }
            },
            Err(e) => {
                warn!("Failed to read config: {}, using defaults", e);
            }
        }
    }
    AppConfig::default()
}

pub fn save_config(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Saved config to {:?}", path);
    Ok(())
}
