use log::{debug, info};
use polars::prelude::PolarsResult;
use serde::{Deserialize, Serialize};

use crate::algorithms::analysis::quantile;
use crate::core::domain::{ModelPoint, ModelSeries};

/// Multiplier applied to the interquartile range for the fences
pub const TUKEY_K: f64 = 1.5;

/// Tukey fence computed from a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFence {
    /// Build the fence `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`; `None` for empty input
    pub fn from_values(values: &[f64]) -> PolarsResult<Option<Self>> {
        let (Some(q1), Some(q3)) = (quantile(values, 0.25)?, quantile(values, 0.75)?) else {
            return Ok(None);
        };
        let iqr = q3 - q1;

        Ok(Some(Self {
            q1,
            q3,
            lower: q1 - TUKEY_K * iqr,
            upper: q3 + TUKEY_K * iqr,
        }))
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Result of filtering a daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// `None` when the input series was empty
    pub fence: Option<IqrFence>,
    pub kept: ModelSeries,
    pub removed: ModelSeries,
}

/// Drop rows whose `y` lies outside the IQR fence of the series itself
///
/// Retained rows keep their relative order. An empty input gives an empty
/// output, and any number of rows may be removed.
pub fn filter_outliers(series: &[ModelPoint]) -> PolarsResult<FilterOutcome> {
    let values: Vec<f64> = series.iter().map(|p| p.y).collect();

    let Some(fence) = IqrFence::from_values(&values)? else {
        return Ok(FilterOutcome {
            fence: None,
            kept: Vec::new(),
            removed: Vec::new(),
        });
    };

    let (kept, removed): (ModelSeries, ModelSeries) =
        series.iter().copied().partition(|p| fence.contains(p.y));

    debug!(
        "IQR fence: q1={:.2} q3={:.2} lower={:.2} upper={:.2}",
        fence.q1, fence.q3, fence.lower, fence.upper
    );
    for point in &removed {
        debug!("Removed outlier {} (y={:.2})", point.ds, point.y);
    }
    info!(
        "Outlier filter kept {} of {} days",
        kept.len(),
        series.len()
    );

    Ok(FilterOutcome {
        fence: Some(fence),
        kept,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ModelSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, y)| {
                ModelPoint::new(NaiveDate::from_ymd_opt(2025, 7, i as u32 + 1).unwrap(), *y)
            })
            .collect()
    }

    fn kept_values(outcome: &FilterOutcome) -> Vec<f64> {
        outcome.kept.iter().map(|p| p.y).collect()
    }

    #[test]
    fn test_fence_values() {
        let fence = IqrFence::from_values(&[0.0, 2.0, 4.0, 6.0, 14.0]).unwrap().unwrap();
        assert_eq!(fence.q1, 2.0);
        assert_eq!(fence.q3, 6.0);
        assert_eq!(fence.iqr(), 4.0);
        assert_eq!(fence.lower, -4.0);
        assert_eq!(fence.upper, 12.0);
        assert!(IqrFence::from_values(&[]).unwrap().is_none());
    }

    #[test]
    fn test_upper_fence_inclusive() {
        let at_fence = filter_outliers(&series(&[0.0, 2.0, 4.0, 6.0, 12.0])).unwrap();
        assert_eq!(kept_values(&at_fence), vec![0.0, 2.0, 4.0, 6.0, 12.0]);

        let beyond = filter_outliers(&series(&[0.0, 2.0, 4.0, 6.0, 13.0])).unwrap();
        assert_eq!(kept_values(&beyond), vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(beyond.removed.len(), 1);
    }

    #[test]
    fn test_lower_fence_inclusive() {
        let at_fence = filter_outliers(&series(&[-4.0, 2.0, 4.0, 6.0, 8.0])).unwrap();
        assert_eq!(at_fence.kept.len(), 5);

        let beyond = filter_outliers(&series(&[-5.0, 2.0, 4.0, 6.0, 8.0])).unwrap();
        assert_eq!(kept_values(&beyond), vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_two_point_series_kept() {
        let outcome = filter_outliers(&series(&[300.0, 200.0])).unwrap();
        let fence = outcome.fence.unwrap();
        assert_eq!(fence.q1, 225.0);
        assert_eq!(fence.q3, 275.0);
        assert_eq!(fence.lower, 150.0);
        assert_eq!(fence.upper, 350.0);
        assert_eq!(kept_values(&outcome), vec![300.0, 200.0]);
    }

    #[test]
    fn test_constant_series_zero_iqr() {
        let outcome = filter_outliers(&series(&[10.0, 10.0, 10.0, 10.0, 9.0])).unwrap();
        let fence = outcome.fence.unwrap();
        assert_eq!(fence.iqr(), 0.0);
        assert_eq!(kept_values(&outcome), vec![10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_empty_series() {
        let outcome = filter_outliers(&[]).unwrap();
        assert!(outcome.fence.is_none());
        assert!(outcome.kept.is_empty());
        assert!(outcome.removed.is_empty());
    }
}
