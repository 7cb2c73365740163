//! Synthetic transaction generator.
//!
//! Builds the catalog, the base transaction table and the per-date sales
//! totals (with injected anomalies), then splits every date's total evenly
//! across that date's transactions.

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GenerationSettings;
use crate::core::catalog::Catalog;
use crate::core::domain::{DailySalesTotal, Transaction};
use crate::synthesis::draws::DrawSequence;

/// Everything the generator produces for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedData {
    /// Transactions in generation order (not sorted by date).
    pub transactions: Vec<Transaction>,
    pub catalog: Catalog,
    pub daily_totals: DailySalesTotal,
    /// Dates whose total was multiplied by an anomaly factor.
    pub anomaly_dates: BTreeSet<NaiveDate>,
}

/// Generator parameterised by [`GenerationSettings`].
///
/// Settings are expected to have passed [`crate::config::EtlConfig::validate`].
pub struct SyntheticGenerator {
    settings: GenerationSettings,
}

impl SyntheticGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Generate one dataset. The same settings always yield the same data.
    pub fn generate(&self) -> GeneratedData {
        let settings = &self.settings;
        let anchor = settings.resolved_anchor();
        let n = settings.records;

        let draws = DrawSequence::seeded(settings.seed);

        let (prices, draws) = draws.catalog_prices(settings.price_range);
        let catalog = Catalog::from_prices(&prices);
        debug!("Catalog built with {} products", catalog.len());

        let (dates, draws) = draws.transaction_dates(n, anchor, settings.window_days);
        let (selected, draws) = draws.product_selection(n, &catalog.product_ids());

        let mut transactions: Vec<Transaction> = dates
            .into_iter()
            .zip(selected)
            .enumerate()
            .filter_map(|(idx, (date, product_id))| {
                catalog.get(product_id).map(|product| {
                    Transaction::new(
                        idx as u32 + 1,
                        date,
                        product_id,
                        product.price,
                        product.category,
                    )
                })
            })
            .collect();

        let counts = count_by_date(&transactions);

        let (raw_totals, draws) = draws.daily_totals(counts.len(), settings.daily_total_range);
        let mut daily_totals: DailySalesTotal =
            counts.keys().copied().zip(raw_totals).collect();

        let ordered_dates = daily_totals.dates();
        let (positions, draws) =
            draws.anomaly_positions(ordered_dates.len(), settings.anomaly_dates);
        let (factors, _) = draws.anomaly_factors(positions.len(), &settings.anomaly_factors);

        let mut anomaly_dates = BTreeSet::new();
        for (position, factor) in positions.iter().zip(factors) {
            let date = ordered_dates[*position];
            daily_totals.scale(&date, factor);
            anomaly_dates.insert(date);
            debug!("Anomaly injected on {} (x{})", date, factor);
        }

        distribute_sales(&mut transactions, &daily_totals);

        info!(
            "Generated {} transactions over {} distinct dates ({} anomaly dates)",
            transactions.len(),
            daily_totals.len(),
            anomaly_dates.len()
        );

        GeneratedData {
            transactions,
            catalog,
            daily_totals,
            anomaly_dates,
        }
    }
}

/// Number of transactions on each distinct date, ascending by date.
pub fn count_by_date(transactions: &[Transaction]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        *counts.entry(tx.date).or_insert(0) += 1;
    }
    counts
}

/// Set each transaction's `sales` to its date's total divided by the number
/// of transactions on that date.
///
/// Transactions whose date has no total are left at their current value.
pub fn distribute_sales(transactions: &mut [Transaction], totals: &DailySalesTotal) {
    let counts = count_by_date(transactions);
    for tx in transactions.iter_mut() {
        if let (Some(total), Some(&count)) = (totals.get(&tx.date), counts.get(&tx.date)) {
            tx.sales = total / count as f64;
        }
    }
}
