use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::domain::WeatherDailyMean;
use crate::error::{EtlError, EtlResult};

/// Top-level forecast response; only the `daily` block is used.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyBlock,
}

/// Parallel arrays of the `daily` block. Individual readings may be null.
#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub min: Vec<Option<f64>>,
}

/// Parse a forecast response body into daily mean temperatures.
pub fn parse_forecast_json_str(json_str: &str) -> EtlResult<WeatherDailyMean> {
    let response: ForecastResponse = serde_json::from_str(json_str)?;
    daily_means(&response.daily)
}

/// Mean of max and min per reported date, `None` when either is missing.
///
/// The arrays are walked together; extra entries in a longer array are ignored.
pub fn daily_means(daily: &DailyBlock) -> EtlResult<WeatherDailyMean> {
    daily
        .time
        .iter()
        .zip(daily.max.iter())
        .zip(daily.min.iter())
        .map(|((time, max), min)| {
            let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                .map_err(|e| EtlError::Parse(format!("Invalid weather date '{}': {}", time, e)))?;
            let mean = match (max, min) {
                (Some(max), Some(min)) => Some((max + min) / 2.0),
                _ => None,
            };
            Ok((date, mean))
        })
        .collect()
}
