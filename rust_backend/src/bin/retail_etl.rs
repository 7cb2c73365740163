//! Retail ETL Binary
//!
//! Generates the synthetic transaction table, enriches it with daily weather,
//! and writes `data_final.csv` and `data_modelo.csv`.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults (or ./etl.toml if present)
//! cargo run --bin retail-etl
//!
//! # Run with an explicit configuration file
//! cargo run --bin retail-etl -- path/to/etl.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::Path;

use anyhow::Context;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use retail_etl::config::EtlConfig;
use retail_etl::preprocessing::EtlPipeline;
use retail_etl::weather::OpenMeteoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting retail ETL");

    // Configuration - read from first argument or default location
    let config = match env::args().nth(1) {
        Some(path) => EtlConfig::from_file(Path::new(&path))
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => EtlConfig::from_default_location().context("Failed to load configuration")?,
    };

    let client = OpenMeteoClient::from_settings(&config.weather)
        .context("Failed to initialize weather client")?;
    let pipeline = EtlPipeline::new(config);

    match pipeline.run(&client).await {
        Ok(report) => {
            info!(
                transactions = report.transactions,
                distinct_dates = report.distinct_dates,
                anomaly_dates = report.anomaly_dates,
                imputed = report.imputed,
                still_missing = report.still_missing,
                retained_days = report.retained_days,
                series_days = report.series_days,
                "ETL completed"
            );
            info!("Transactions written to {}", report.transactions_path.display());
            info!("Model series written to {}", report.model_series_path.display());
            Ok(())
        }
        Err(e) => {
            error!("ETL failed: {:#}", e);
            Err(e)
        }
    }
}
