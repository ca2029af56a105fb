//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{PhaseRange, TOTAL_TERRITORY_POINTS};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Snapshot file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// File name prefix before `_DDMMYY`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// File extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_file_prefix() -> String {
    "tb_data".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            extension: default_extension(),
        }
    }
}

/// Widest phase range accepted for the derived totals.
pub const MAX_PHASE_SPAN: u32 = 32;

/// Derived metric settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// First phase summed into the phase-range totals
    #[serde(default = "default_phase_first")]
    pub phase_first: u32,

    /// Last phase summed into the phase-range totals (inclusive)
    #[serde(default = "default_phase_last")]
    pub phase_last: u32,

    /// Summary column the table is sorted by, descending
    #[serde(default = "default_sort_metric")]
    pub sort_metric: String,

    /// Append the "Guild Average" row to summaries by default
    #[serde(default)]
    pub include_average: bool,
}

fn default_phase_first() -> u32 {
    3
}

fn default_phase_last() -> u32 {
    6
}

fn default_sort_metric() -> String {
    TOTAL_TERRITORY_POINTS.to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            phase_first: default_phase_first(),
            phase_last: default_phase_last(),
            sort_metric: default_sort_metric(),
            include_average: false,
        }
    }
}

impl MetricsConfig {
    pub fn phases(&self) -> PhaseRange {
        PhaseRange::new(self.phase_first, self.phase_last)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Stat/zone identifier label file; relative paths resolve against `data_dir`
    #[serde(default = "default_names_file")]
    pub names_file: PathBuf,

    /// Planet zone definition file; relative paths resolve against `data_dir`
    #[serde(default = "default_zones_file")]
    pub zones_file: PathBuf,

    #[serde(default)]
    pub snapshots: SnapshotConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_names_file() -> PathBuf {
    PathBuf::from("map_stat_names.json")
}

fn default_zones_file() -> PathBuf {
    PathBuf::from("zone_definitions.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            names_file: default_names_file(),
            zones_file: default_zones_file(),
            snapshots: SnapshotConfig::default(),
            metrics: MetricsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn names_path(&self) -> PathBuf {
        self.data_dir.join(&self.names_file)
    }

    pub fn zones_path(&self) -> PathBuf {
        self.data_dir.join(&self.zones_file)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.snapshots.file_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Snapshot file prefix must not be empty".to_string(),
            ));
        }

        if self.snapshots.extension.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Snapshot extension must not be empty".to_string(),
            ));
        }

        let phases = self.metrics.phases();
        if !phases.is_empty() && phases.last - phases.first >= MAX_PHASE_SPAN {
            return Err(ConfigError::ValidationError(format!(
                "Phase range P{}-P{} spans more than {} phases",
                phases.first, phases.last, MAX_PHASE_SPAN
            )));
        }

        if self.metrics.sort_metric.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Sort metric must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
