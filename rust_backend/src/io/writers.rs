use log::info;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::core::domain::{ModelPoint, Transaction};
use crate::error::{EtlError, EtlResult};
use crate::parsing::csv_parser::{model_series_to_dataframe, transactions_to_dataframe};

/// Write a DataFrame as comma-separated text with a header row and no index column
pub fn write_dataframe_csv(df: &mut DataFrame, path: &Path) -> EtlResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            EtlError::Sink(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let mut file = File::create(path)
        .map_err(|e| EtlError::Sink(format!("Failed to create {}: {}", path.display(), e)))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| EtlError::Sink(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

/// Persist the enriched transaction table
pub fn write_transactions_csv(transactions: &[Transaction], path: &Path) -> EtlResult<()> {
    let mut df = transactions_to_dataframe(transactions)?;
    write_dataframe_csv(&mut df, path)?;
    info!("Wrote {} transactions to {}", df.height(), path.display());
    Ok(())
}

/// Persist the filtered daily series as (`ds`, `y`)
pub fn write_model_series_csv(series: &[ModelPoint], path: &Path) -> EtlResult<()> {
    let mut df = model_series_to_dataframe(series)?;
    write_dataframe_csv(&mut df, path)?;
    info!("Wrote {} daily rows to {}", df.height(), path.display());
    Ok(())
}

/// Destination pair for the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSink {
    pub transactions_path: PathBuf,
    pub model_series_path: PathBuf,
}

impl CsvSink {
    pub fn new(transactions_path: impl Into<PathBuf>, model_series_path: impl Into<PathBuf>) -> Self {
        Self {
            transactions_path: transactions_path.into(),
            model_series_path: model_series_path.into(),
        }
    }

    /// Write both artifacts. A failure is surfaced as-is, with no cleanup.
    pub fn write(&self, transactions: &[Transaction], series: &[ModelPoint]) -> EtlResult<()> {
        write_model_series_csv(series, &self.model_series_path)?;
        write_transactions_csv(transactions, &self.transactions_path)?;
        Ok(())
    }
}
