use log::{debug, warn};
use polars::prelude::*;
use std::collections::BTreeMap;

use crate::core::domain::{Transaction, WeatherDailyMean};

/// Counts reported by the merge and imputation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImputationStats {
    /// Rows whose date had a usable mean after the join
    pub matched: usize,
    /// Rows filled from their day-of-month average
    pub filled: usize,
    /// Rows still missing after imputation
    pub still_missing: usize,
}

/// Left join transactions to daily means on date.
///
/// Every transaction is kept. `temp_media` is the date's mean, or `None` when
/// the date is absent from `weather` or the source reported no value for it.
pub fn merge_temperature(transactions: &[Transaction], weather: &WeatherDailyMean) -> Vec<Transaction> {
    let merged: Vec<Transaction> = transactions
        .iter()
        .map(|tx| Transaction {
            temp_media: weather.get(&tx.date).flatten(),
            ..tx.clone()
        })
        .collect();

    let unmatched = transactions
        .iter()
        .filter(|tx| !weather.contains(&tx.date))
        .count();
    if unmatched > 0 {
        warn!("{} transactions have no weather entry for their date", unmatched);
    }

    merged
}

/// Mean `temp_media` per day of month over the rows that have one.
///
/// Days whose rows are all missing have no entry.
pub fn day_of_month_means(transactions: &[Transaction]) -> PolarsResult<BTreeMap<u32, f64>> {
    let days: Vec<u32> = transactions.iter().map(|tx| tx.day_of_month()).collect();
    let temps: Vec<Option<f64>> = transactions.iter().map(|tx| tx.temp_media).collect();

    let grouped = df!(
        "day" => days,
        "temp_media" => temps,
    )?
    .lazy()
    .group_by([col("day")])
    .agg([col("temp_media").mean()])
    .collect()?;

    let day = grouped.column("day")?.u32()?;
    let mean = grouped.column("temp_media")?.f64()?;

    Ok(day
        .into_iter()
        .zip(mean.into_iter())
        .filter_map(|(day, mean)| Some((day?, mean?)))
        .collect())
}

/// Fill missing `temp_media` with the average for the same day of month.
///
/// Bucket averages are computed once from the non-missing rows, then applied
/// in a single pass. Rows whose bucket is empty stay missing. Rows that
/// already have a value are untouched, so applying this twice is the same
/// as applying it once.
pub fn impute_by_day_of_month(transactions: &mut [Transaction]) -> PolarsResult<ImputationStats> {
    let means = day_of_month_means(transactions)?;
    let mut stats = ImputationStats::default();

    for tx in transactions.iter_mut() {
        if tx.temp_media.is_some() {
            stats.matched += 1;
            continue;
        }
        match means.get(&tx.day_of_month()) {
            Some(mean) => {
                tx.temp_media = Some(*mean);
                stats.filled += 1;
            }
            None => stats.still_missing += 1,
        }
    }

    debug!(
        "Imputation: {} matched, {} filled from {} day-of-month buckets, {} still missing",
        stats.matched,
        stats.filled,
        means.len(),
        stats.still_missing
    );
    if stats.still_missing > 0 {
        warn!(
            "{} transactions have no temperature after imputation",
            stats.still_missing
        );
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Category;
    use chrono::NaiveDate;

    fn tx(id: u32, month: u32, day: u32) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
            1,
            10.0,
            Category::Books,
        )
    }

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_merge_keeps_all_rows() {
        let transactions = vec![tx(1, 1, 5), tx(2, 1, 6), tx(3, 1, 7)];
        let weather: WeatherDailyMean = vec![(d(1, 5), Some(14.0)), (d(1, 6), None)]
            .into_iter()
            .collect();

        let merged = merge_temperature(&transactions, &weather);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].temp_media, Some(14.0));
        assert_eq!(merged[1].temp_media, None);
        assert_eq!(merged[2].temp_media, None);
        assert_eq!(merged[0].id, 1);
    }

    #[test]
    fn test_impute_uses_same_day_across_months() {
        let mut rows = vec![tx(1, 1, 15), tx(2, 2, 15), tx(3, 3, 15), tx(4, 3, 16)];
        rows[0].temp_media = Some(10.0);
        rows[1].temp_media = Some(20.0);

        let stats = impute_by_day_of_month(&mut rows).unwrap();

        assert_eq!(rows[2].temp_media, Some(15.0));
        assert_eq!(rows[3].temp_media, None);
        assert_eq!(
            stats,
            ImputationStats {
                matched: 2,
                filled: 1,
                still_missing: 1
            }
        );
    }

    #[test]
    fn test_impute_is_idempotent() {
        let mut rows = vec![tx(1, 1, 1), tx(2, 2, 1), tx(3, 2, 2)];
        rows[0].temp_media = Some(11.0);

        impute_by_day_of_month(&mut rows).unwrap();
        let once = rows.clone();
        impute_by_day_of_month(&mut rows).unwrap();

        assert_eq!(rows, once);
    }

    #[test]
    fn test_day_of_month_means_ignores_missing() {
        let mut rows = vec![tx(1, 1, 3), tx(2, 2, 3), tx(3, 3, 3)];
        rows[0].temp_media = Some(12.0);
        rows[2].temp_media = Some(18.0);

        let means = day_of_month_means(&rows).unwrap();
        assert_eq!(means.get(&3), Some(&15.0));
        assert_eq!(means.len(), 1);
    }

    #[test]
    fn test_day_of_month_means_skips_all_missing_buckets() {
        let mut rows = vec![tx(1, 1, 4), tx(2, 2, 4), tx(3, 1, 5), tx(4, 2, 6)];
        rows[0].temp_media = Some(9.0);
        rows[1].temp_media = Some(12.0);
        rows[3].temp_media = Some(20.0);

        let means = day_of_month_means(&rows).unwrap();
        assert_eq!(means.into_iter().collect::<Vec<_>>(), vec![(4, 10.5), (6, 20.0)]);

        assert!(day_of_month_means(&[]).unwrap().is_empty());
    }
}
