use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::{ModelPoint, ModelSeries, Transaction};
use crate::parsing::csv_parser::model_series_to_dataframe;

/// Summary statistics of a daily series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub days: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Sum `sales` per date, one row per distinct date, ascending by date
///
/// # Arguments
/// * `transactions` - Rows in any order
///
/// # Returns
/// The daily series with `ds` the date and `y` the summed sales
pub fn aggregate_daily_sales(transactions: &[Transaction]) -> ModelSeries {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in transactions {
        *sums.entry(tx.date).or_insert(0.0) += tx.sales;
    }

    sums.into_iter()
        .map(|(ds, y)| ModelPoint::new(ds, y))
        .collect()
}

/// Quantile with linear interpolation between closest ranks
///
/// For sorted values `v` of length `n` the position is `(n - 1) * q`;
/// the result interpolates between the two neighbouring values.
///
/// # Arguments
/// * `values` - Unsorted input
/// * `q` - Quantile, clamped to `[0, 1]`
///
/// # Returns
/// `None` for empty input
pub fn quantile(values: &[f64], q: f64) -> PolarsResult<Option<f64>> {
    let ca = Float64Chunked::from_slice("values".into(), values);
    ca.quantile(q.clamp(0.0, 1.0), QuantileMethod::Linear)
}

/// Compute summary statistics of a daily series
///
/// # Returns
/// `None` for an empty series
pub fn compute_series_snapshot(series: &[ModelPoint]) -> PolarsResult<Option<SeriesSnapshot>> {
    let df = model_series_to_dataframe(series)?;
    let y = df.column("y")?.f64()?;

    let (Some(mean), Some(median), Some(min), Some(max)) = (y.mean(), y.median(), y.min(), y.max())
    else {
        return Ok(None);
    };

    Ok(Some(SeriesSnapshot {
        days: df.height(),
        total: y.sum().unwrap_or(0.0),
        mean,
        median,
        min,
        max,
    }))
}
