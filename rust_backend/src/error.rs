//! Error types for ETL operations.

use polars::prelude::PolarsError;

/// Result type for ETL operations
pub type EtlResult<T> = Result<T, EtlError>;

/// Error type for ETL operations
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Weather source error: {0}")]
    Weather(String),

    #[error("Weather source returned {status}: {body}")]
    WeatherStatus { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
