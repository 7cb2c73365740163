use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use crate::algorithms::analysis::{aggregate_daily_sales, compute_series_snapshot};
use crate::config::EtlConfig;
use crate::core::domain::{ModelSeries, Transaction, WeatherDailyMean};
use crate::io::writers::CsvSink;
use crate::preprocessing::enricher::WeatherEnricher;
use crate::synthesis::generator::{GeneratedData, SyntheticGenerator};
use crate::transformations::cleaning::{impute_by_day_of_month, merge_temperature, ImputationStats};
use crate::transformations::filtering::{filter_outliers, IqrFence};
use crate::weather::WeatherSource;

/// In-memory result of every pipeline step before persistence
pub struct PipelineTables {
    pub generated: GeneratedData,
    pub weather: WeatherDailyMean,
    /// Transactions with `temp_media` joined and imputed
    pub enriched: Vec<Transaction>,
    /// Daily totals before outlier filtering
    pub daily_series: ModelSeries,
    /// Daily totals after outlier filtering
    pub model_series: ModelSeries,
    pub imputation: ImputationStats,
    pub fence: Option<IqrFence>,
}

/// Counts describing one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub transactions: usize,
    pub distinct_dates: usize,
    pub anomaly_dates: usize,
    pub weather_days: usize,
    pub missing_after_join: usize,
    pub imputed: usize,
    pub still_missing: usize,
    pub series_days: usize,
    pub retained_days: usize,
    pub fence: Option<IqrFence>,
    pub transactions_path: PathBuf,
    pub model_series_path: PathBuf,
}

impl PipelineReport {
    fn from_tables(tables: &PipelineTables, sink: &CsvSink) -> Self {
        Self {
            transactions: tables.enriched.len(),
            distinct_dates: tables.generated.daily_totals.len(),
            anomaly_dates: tables.generated.anomaly_dates.len(),
            weather_days: tables.weather.len(),
            missing_after_join: tables.imputation.filled + tables.imputation.still_missing,
            imputed: tables.imputation.filled,
            still_missing: tables.imputation.still_missing,
            series_days: tables.daily_series.len(),
            retained_days: tables.model_series.len(),
            fence: tables.fence,
            transactions_path: sink.transactions_path.clone(),
            model_series_path: sink.model_series_path.clone(),
        }
    }
}

/// Main ETL pipeline
pub struct EtlPipeline {
    config: EtlConfig,
}

impl EtlPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run every step except persistence
    ///
    /// # Arguments
    /// * `source` - Provider of daily temperatures
    ///
    /// # Returns
    /// All intermediate and final tables
    pub async fn run_in_memory(&self, source: &dyn WeatherSource) -> Result<PipelineTables> {
        self.config.validate().context("Invalid pipeline configuration")?;

        // Step 1: Generate transactions and daily totals
        let generated = SyntheticGenerator::new(self.config.generation.clone()).generate();

        // Step 2: Fetch daily mean temperatures for the covered range
        let enricher = WeatherEnricher::new(source, self.config.weather.clone());
        let weather = enricher
            .fetch_daily_means(&generated.transactions)
            .await
            .context("Weather enrichment failed")?;

        // Step 3: Left join and day-of-month imputation
        let mut enriched = merge_temperature(&generated.transactions, &weather);
        let imputation =
            impute_by_day_of_month(&mut enriched).context("Day-of-month imputation failed")?;

        // Step 4: Aggregate the original sales per date and drop outlier days
        let daily_series = aggregate_daily_sales(&generated.transactions);
        let outcome = filter_outliers(&daily_series).context("Outlier filtering failed")?;
        if let Some(snapshot) = compute_series_snapshot(&outcome.kept)? {
            debug!(
                "Retained series: {} days, mean {:.2}, median {:.2}, range [{:.2}, {:.2}]",
                snapshot.days, snapshot.mean, snapshot.median, snapshot.min, snapshot.max
            );
        }

        Ok(PipelineTables {
            generated,
            weather,
            enriched,
            daily_series,
            model_series: outcome.kept,
            imputation,
            fence: outcome.fence,
        })
    }

    /// Run the full pipeline and write both artifacts
    ///
    /// Nothing is written unless every preceding step succeeded.
    pub async fn run(&self, source: &dyn WeatherSource) -> Result<PipelineReport> {
        let tables = self.run_in_memory(source).await?;

        // Step 5: Persist
        let sink = CsvSink::new(
            self.config.output.transactions_path.clone(),
            self.config.output.model_series_path.clone(),
        );
        sink.write(&tables.enriched, &tables.model_series)
            .context("Failed to write output artifacts")?;

        let report = PipelineReport::from_tables(&tables, &sink);
        info!(
            "Pipeline finished: {} transactions, {} of {} days retained",
            report.transactions, report.retained_days, report.series_days
        );

        Ok(report)
    }
}

impl Default for EtlPipeline {
    fn default() -> Self {
        Self::new(EtlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EtlError, EtlResult};
    use crate::weather::WeatherRequest;
    use async_trait::async_trait;
    use chrono::{Datelike, NaiveDate};

    /// Reports every day in range, leaving every seventh day of the year without a value
    struct PatternSource;

    #[async_trait]
    impl WeatherSource for PatternSource {
        async fn daily_means(&self, request: &WeatherRequest) -> EtlResult<WeatherDailyMean> {
            Ok(request
                .range
                .start
                .iter_days()
                .take_while(|d| *d <= request.range.end)
                .map(|d| {
                    let mean = if d.ordinal() % 7 == 0 {
                        None
                    } else {
                        Some(10.0 + d.day() as f64 / 10.0)
                    };
                    (d, mean)
                })
                .collect())
        }
    }

    fn config(records: usize) -> EtlConfig {
        let mut config = EtlConfig::default();
        config.generation.records = records;
        config.generation.anchor_date = NaiveDate::from_ymd_opt(2025, 6, 30);
        config
    }

    #[tokio::test]
    async fn test_run_in_memory_counts() {
        let pipeline = EtlPipeline::new(config(400));
        let tables = pipeline.run_in_memory(&PatternSource).await.unwrap();

        assert_eq!(tables.enriched.len(), 400);
        assert_eq!(tables.daily_series.len(), tables.generated.daily_totals.len());
        assert!(tables.model_series.len() <= tables.daily_series.len());

        let stats = tables.imputation;
        assert_eq!(stats.matched + stats.filled + stats.still_missing, 400);
        assert!(stats.filled > 0);
        assert_eq!(
            tables.enriched.iter().filter(|t| t.temp_media.is_none()).count(),
            stats.still_missing
        );
    }

    #[tokio::test]
    async fn test_oversized_window_rejected_before_generation() {
        let mut config = config(10);
        config.generation.window_days = 4_000_000_000;

        let result = EtlPipeline::new(config).run_in_memory(&PatternSource).await;

        let err = result.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_enrichment_preserves_sales() {
        let pipeline = EtlPipeline::new(config(100));
        let tables = pipeline.run_in_memory(&PatternSource).await.unwrap();

        for (enriched, original) in tables.enriched.iter().zip(&tables.generated.transactions) {
            assert_eq!(enriched.id, original.id);
            assert_eq!(enriched.sales, original.sales);
        }
    }
}
