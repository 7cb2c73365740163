use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::core::domain::{ModelPoint, Transaction};
use crate::parsing::csv_parser;

/// Unified interface for reading the pipeline's artifacts back
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Load an artifact as a DataFrame with known columns cast to their types
    pub fn load_dataframe(path: &Path) -> Result<DataFrame> {
        csv_parser::parse_csv(path)
    }

    /// Load the enriched transaction table
    pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
        let df = Self::load_dataframe(path).context("Failed to load transactions")?;
        csv_parser::dataframe_to_transactions(&df)
            .context("Failed to convert DataFrame to transactions")
    }

    /// Load the filtered daily series
    pub fn load_model_series(path: &Path) -> Result<Vec<ModelPoint>> {
        let df = Self::load_dataframe(path).context("Failed to load model series")?;
        csv_parser::dataframe_to_model_series(&df)
            .context("Failed to convert DataFrame to model series")
    }
}
