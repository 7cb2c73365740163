use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::WeatherSettings;
use crate::core::domain::{Transaction, WeatherDailyMean};
use crate::weather::{DateRange, WeatherRequest, WeatherSource};

/// Enricher that fetches daily mean temperatures covering a transaction set
pub struct WeatherEnricher<'a> {
    source: &'a dyn WeatherSource,
    settings: WeatherSettings,
}

impl<'a> WeatherEnricher<'a> {
    /// Create an enricher for the given source and location
    pub fn new(source: &'a dyn WeatherSource, settings: WeatherSettings) -> Self {
        Self { source, settings }
    }

    /// The request covering every transaction date, if there are any
    pub fn request_for(&self, transactions: &[Transaction]) -> Option<WeatherRequest> {
        DateRange::spanning(transactions.iter().map(|t| t.date))
            .map(|range| WeatherRequest::new(&self.settings, range))
    }

    /// Fetch daily means from `min(date)` to `max(date)` inclusive.
    ///
    /// An empty transaction set issues no request. Source failures abort.
    pub async fn fetch_daily_means(&self, transactions: &[Transaction]) -> Result<WeatherDailyMean> {
        let Some(request) = self.request_for(transactions) else {
            warn!("No transactions to enrich, skipping weather request");
            return Ok(WeatherDailyMean::new());
        };

        let means = self
            .source
            .daily_means(&request)
            .await
            .context("Failed to fetch daily temperatures")?;

        let expected = request.range.num_days();
        if (means.len() as i64) < expected {
            warn!(
                "Weather source returned {} of {} days; unmatched dates fall back to imputation",
                means.len(),
                expected
            );
        }
        if means.missing_count() > 0 {
            warn!(
                "Weather source reported {} days without max/min temperature",
                means.missing_count()
            );
        }
        info!("Fetched daily mean temperature for {} days", means.len());

        Ok(means)
    }
}
