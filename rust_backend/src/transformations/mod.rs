//! Data cleaning and filtering.
//!
//! # Modules
//!
//! - [`cleaning`]: Join daily temperatures and impute the gaps
//! - [`filtering`]: Remove outlier days from the aggregated series
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use retail_etl::core::domain::ModelPoint;
//! use retail_etl::transformations::filter_outliers;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let series = vec![
//!     ModelPoint::new(day(1), 0.0),
//!     ModelPoint::new(day(2), 2.0),
//!     ModelPoint::new(day(3), 4.0),
//!     ModelPoint::new(day(4), 6.0),
//!     ModelPoint::new(day(5), 40.0),
//! ];
//!
//! let outcome = filter_outliers(&series)?;
//! assert_eq!(outcome.kept.len(), 4);
//! # Ok::<(), polars::prelude::PolarsError>(())
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{day_of_month_means, impute_by_day_of_month, merge_temperature, ImputationStats};
pub use filtering::{filter_outliers, FilterOutcome, IqrFence, TUKEY_K};
