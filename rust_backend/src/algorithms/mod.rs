//! Aggregation and descriptive statistics over the daily series.

pub mod analysis;

pub use analysis::{aggregate_daily_sales, compute_series_snapshot, quantile, SeriesSnapshot};
