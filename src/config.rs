//! Configuration types for lookahead-bt

use crate::backtest::BacktestConfig;
use crate::performance::PerformanceConfig;
use crate::strategy::LookaheadStrategy;
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub strategy: LookaheadStrategy,
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price data source
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// JSON tick dump or Parquet file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Keep only the first rows; 0 keeps everything
    #[serde(default)]
    pub top_n: usize,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/raw/data.json")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            top_n: 0,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Configuration bundled with the binary
    pub fn bundled() -> anyhow::Result<Self> {
        let config: Config = toml::from_str(include_str!("../config.toml.example"))?;
        Ok(config)
    }
}
