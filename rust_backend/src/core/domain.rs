//! Domain models for retail transactions and the tables derived from them.
//!
//! This module provides the record types that flow through the pipeline:
//! generated transactions, the per-date sales totals they were split from,
//! the daily mean temperature series and the aggregated model series.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::Category;

/// One generated sale.
///
/// `sales` is set by the generator; `temp_media` starts as `None` and is set
/// once by the merge/imputation step. A transaction is not mutated afterwards.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use retail_etl::core::catalog::Category;
/// use retail_etl::core::domain::Transaction;
///
/// let tx = Transaction::new(
///     1,
///     NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
///     13,
///     9999.99,
///     Category::Toys,
/// );
/// assert_eq!(tx.day_of_month(), 14);
/// assert!(tx.temp_media.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub date: NaiveDate,
    pub product_id: u32,
    pub price: f64,
    pub category: Category,
    pub sales: f64,
    pub temp_media: Option<f64>,
}

impl Transaction {
    /// Creates a transaction with no sales amount and no temperature yet.
    pub fn new(id: u32, date: NaiveDate, product_id: u32, price: f64, category: Category) -> Self {
        Self {
            id,
            date,
            product_id,
            price,
            category,
            sales: 0.0,
            temp_media: None,
        }
    }

    /// Calendar day component of the date (1-31).
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }
}

/// Date -> synthetic total sales for that date.
///
/// Keys are exactly the distinct dates present in the generated transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySalesTotal {
    totals: BTreeMap<NaiveDate, f64>,
}

impl DailySalesTotal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, total: f64) {
        self.totals.insert(date, total);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.totals.get(date).copied()
    }

    /// Multiply the total for `date` in place; no-op for unknown dates.
    pub fn scale(&mut self, date: &NaiveDate, factor: f64) {
        if let Some(total) = self.totals.get_mut(date) {
            *total *= factor;
        }
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.totals.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.totals.iter()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl FromIterator<(NaiveDate, f64)> for DailySalesTotal {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            totals: iter.into_iter().collect(),
        }
    }
}

/// Date -> mean temperature, `None` where the source lacked max or min.
///
/// Dates the source never reported are absent from the map, which is
/// distinct from a present-but-missing mean.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherDailyMean {
    means: BTreeMap<NaiveDate, Option<f64>>,
}

impl WeatherDailyMean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, mean: Option<f64>) {
        self.means.insert(date, mean);
    }

    /// `None` if the date is absent, `Some(None)` if present without a value.
    pub fn get(&self, date: &NaiveDate) -> Option<Option<f64>> {
        self.means.get(date).copied()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.means.contains_key(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Option<f64>)> {
        self.means.iter()
    }

    /// Number of dates reported by the source without a usable mean.
    pub fn missing_count(&self) -> usize {
        self.means.values().filter(|m| m.is_none()).count()
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

impl FromIterator<(NaiveDate, Option<f64>)> for WeatherDailyMean {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Option<f64>)>>(iter: I) -> Self {
        Self {
            means: iter.into_iter().collect(),
        }
    }
}

/// One row of the model series: a date (`ds`) and its total sales (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

impl ModelPoint {
    pub fn new(ds: NaiveDate, y: f64) -> Self {
        Self { ds, y }
    }
}

/// Date-ordered daily aggregate, one row per distinct date.
pub type ModelSeries = Vec<ModelPoint>;
