use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::logfmt;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("energy_data.db"),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// IIO device directory holding the `in_voltage*_raw` attributes.
    pub device_dir: PathBuf,
    pub channel: u32,
    /// Positive full-scale raw count of the ADC (2^15 - 1 for a 16-bit
    /// bipolar converter).
    pub full_scale: i32,
    /// Volts at full scale for the configured gain.
    pub reference_voltage: f64,
    /// Empirical volts-to-amps factor for the sensor/burden-resistor pair.
    pub calibration_factor: f64,
    /// Assumed AC supply voltage, region-dependent.
    pub line_voltage: f64,
    pub sample_interval_secs: u64,
    /// Raw reads per measurement burst.
    pub burst_samples: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_dir: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
            channel: 0,
            full_scale: 32767,
            reference_voltage: 4.096,
            calibration_factor: 20.0,
            line_voltage: 230.0,
            sample_interval_secs: 5,
            burst_samples: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub history_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            history_limit: energy_client::db::usage_queries::DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub power_log: PathBuf,
    pub api_log: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            power_log: PathBuf::from(logfmt::POWER_LOG_FILE),
            api_log: PathBuf::from(logfmt::API_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sensor: SensorConfig,
    pub api: ApiConfig,
    pub logs: LogsConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from the TOML file named by `MONITOR_CONFIG` (default
    /// `monitor-config.toml`). A missing file is not an error: every value
    /// has a deploy-sensible default.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var("MONITOR_CONFIG").unwrap_or_else(|_| "monitor-config.toml".to_string());
        if !Path::new(&path).exists() {
            tracing::info!(path = %path, "config file not found, using built-in defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
