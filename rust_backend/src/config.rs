//! Pipeline configuration file support.
//!
//! Every setting has a default equal to the fixed constants of a standard run,
//! so a missing configuration file is not an error. A TOML file may override
//! any subset of the fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EtlError, EtlResult};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EtlConfig {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Synthetic data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_records")]
    pub records: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Last day of the date window. `None` means today (local time).
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,
    #[serde(default = "default_price_range")]
    pub price_range: (f64, f64),
    #[serde(default = "default_daily_total_range")]
    pub daily_total_range: (f64, f64),
    #[serde(default = "default_anomaly_dates")]
    pub anomaly_dates: usize,
    #[serde(default = "default_anomaly_factors")]
    pub anomaly_factors: Vec<f64>,
}

/// Weather source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Artifact locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_transactions_path")]
    pub transactions_path: PathBuf,
    #[serde(default = "default_model_series_path")]
    pub model_series_path: PathBuf,
}

fn default_records() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

/// Longest date window accepted, in days (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

fn default_window_days() -> u32 {
    180
}

fn default_price_range() -> (f64, f64) {
    (5000.0, 20000.0)
}

fn default_daily_total_range() -> (f64, f64) {
    (35000.0, 65000.0)
}

fn default_anomaly_dates() -> usize {
    10
}

fn default_anomaly_factors() -> Vec<f64> {
    vec![0.2, 0.3, 2.0, 3.0, 4.0]
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_latitude() -> f64 {
    4.7110
}

fn default_longitude() -> f64 {
    -74.0721
}

fn default_timezone() -> String {
    "America/Bogota".to_string()
}

fn default_transactions_path() -> PathBuf {
    PathBuf::from("data_final.csv")
}

fn default_model_series_path() -> PathBuf {
    PathBuf::from("data_modelo.csv")
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            records: default_records(),
            seed: default_seed(),
            window_days: default_window_days(),
            anchor_date: None,
            price_range: default_price_range(),
            daily_total_range: default_daily_total_range(),
            anomaly_dates: default_anomaly_dates(),
            anomaly_factors: default_anomaly_factors(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            transactions_path: default_transactions_path(),
            model_series_path: default_model_series_path(),
        }
    }
}

impl GenerationSettings {
    /// The anchor date, falling back to today's local date.
    pub fn resolved_anchor(&self) -> NaiveDate {
        self.anchor_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl EtlConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EtlConfig)` if the file was read, parsed and validated
    /// * `Err(EtlError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> EtlResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EtlError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> EtlResult<Self> {
        let config: EtlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `etl.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to the built-in defaults when no file exists.
    pub fn from_default_location() -> EtlResult<Self> {
        let search_paths = [
            PathBuf::from("etl.toml"),
            PathBuf::from("rust_backend/etl.toml"),
            PathBuf::from("../etl.toml"),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        log::debug!("No etl.toml found, using built-in defaults");
        Ok(Self::default())
    }

    /// Reject settings that would make generation or filtering meaningless.
    pub fn validate(&self) -> EtlResult<()> {
        let gen = &self.generation;

        if gen.records == 0 {
            return Err(EtlError::Configuration(
                "generation.records must be greater than zero".to_string(),
            ));
        }
        if gen.window_days > MAX_WINDOW_DAYS {
            return Err(EtlError::Configuration(format!(
                "generation.window_days must be at most {}, got {}",
                MAX_WINDOW_DAYS, gen.window_days
            )));
        }
        if gen.anomaly_factors.is_empty() {
            return Err(EtlError::Configuration(
                "generation.anomaly_factors must not be empty".to_string(),
            ));
        }
        if !(gen.price_range.0 < gen.price_range.1) {
            return Err(EtlError::Configuration(format!(
                "generation.price_range is inverted: {:?}",
                gen.price_range
            )));
        }
        if !(gen.daily_total_range.0 < gen.daily_total_range.1) {
            return Err(EtlError::Configuration(format!(
                "generation.daily_total_range is inverted: {:?}",
                gen.daily_total_range
            )));
        }
        if self.weather.base_url.is_empty() {
            return Err(EtlError::Configuration(
                "weather.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
