//! External weather source.
//!
//! [`WeatherSource`] is the seam between the pipeline and the provider.
//! [`OpenMeteoClient`] is the HTTP implementation; tests substitute an
//! in-memory source.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};

use crate::config::WeatherSettings;
use crate::core::domain::WeatherDailyMean;
use crate::error::{EtlError, EtlResult};
use crate::parsing::weather_json::parse_forecast_json_str;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Smallest range containing every date, `None` for an empty input.
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |range, date| match range {
            None => Some(DateRange {
                start: date,
                end: date,
            }),
            Some(DateRange { start, end }) => Some(DateRange {
                start: start.min(date),
                end: end.max(date),
            }),
        })
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One daily-temperature request for a fixed location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub range: DateRange,
    pub timezone: String,
}

impl WeatherRequest {
    pub fn new(settings: &WeatherSettings, range: DateRange) -> Self {
        Self {
            latitude: settings.latitude,
            longitude: settings.longitude,
            range,
            timezone: settings.timezone.clone(),
        }
    }

    /// Query parameters in the order the provider documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start_date", self.range.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.range.end.format("%Y-%m-%d").to_string()),
            ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
            ("timezone", self.timezone.clone()),
        ]
    }
}

/// Provider of daily mean temperatures.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch daily means for every date the provider reports in the range.
    ///
    /// Any failure is fatal to the caller; there is no retry.
    async fn daily_means(&self, request: &WeatherRequest) -> EtlResult<WeatherDailyMean>;
}

/// HTTP client for the Open-Meteo forecast endpoint.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>) -> EtlResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EtlError::Weather(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &WeatherSettings) -> EtlResult<Self> {
        Self::new(settings.base_url.clone())
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn daily_means(&self, request: &WeatherRequest) -> EtlResult<WeatherDailyMean> {
        info!(
            "Requesting daily temperatures {} to {} at ({}, {})",
            request.range.start, request.range.end, request.latitude, request.longitude
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| EtlError::Weather(format!("Failed to reach weather source: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            EtlError::Weather(format!("Failed to read weather response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(EtlError::WeatherStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let means = parse_forecast_json_str(&body)?;
        debug!("Weather source reported {} days", means.len());
        Ok(means)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FORECAST_PATH: &str = "/v1/forecast";

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_date_range_spanning() {
        let range = DateRange::spanning(vec![d(3, 5), d(1, 20), d(2, 1), d(1, 20)]).unwrap();
        assert_eq!(range.start, d(1, 20));
        assert_eq!(range.end, d(3, 5));
        assert_eq!(range.num_days(), 45);

        assert!(DateRange::spanning(Vec::new()).is_none());
    }

    #[test]
    fn test_query_pairs() {
        let range = DateRange {
            start: d(1, 1),
            end: d(1, 31),
        };
        let request = WeatherRequest::new(&WeatherSettings::default(), range);
        let pairs = request.query_pairs();

        assert!(pairs.contains(&("latitude", "4.711".to_string())));
        assert!(pairs.contains(&("longitude", "-74.0721".to_string())));
        assert!(pairs.contains(&("start_date", "2025-01-01".to_string())));
        assert!(pairs.contains(&("end_date", "2025-01-31".to_string())));
        assert!(pairs.contains(&(
            "daily",
            "temperature_2m_max,temperature_2m_min".to_string()
        )));
        assert!(pairs.contains(&("timezone", "America/Bogota".to_string())));
    }

    fn january_request() -> WeatherRequest {
        WeatherRequest::new(
            &WeatherSettings::default(),
            DateRange {
                start: d(1, 1),
                end: d(1, 3),
            },
        )
    }

    async fn client_for(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(format!("{}{}", server.uri(), FORECAST_PATH)).unwrap()
    }

    #[tokio::test]
    async fn test_client_sends_query_and_decodes_means() {
        let server = MockServer::start().await;
        let body = r#"{
            "latitude": 4.7,
            "daily": {
                "time": ["2025-01-01", "2025-01-02", "2025-01-03"],
                "temperature_2m_max": [20.0, null, 18.5],
                "temperature_2m_min": [10.0, 8.0, null]
            }
        }"#;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .and(query_param("latitude", "4.711"))
            .and(query_param("longitude", "-74.0721"))
            .and(query_param("start_date", "2025-01-01"))
            .and(query_param("end_date", "2025-01-03"))
            .and(query_param("daily", "temperature_2m_max,temperature_2m_min"))
            .and(query_param("timezone", "America/Bogota"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let means = client_for(&server)
            .await
            .daily_means(&january_request())
            .await
            .unwrap();

        assert_eq!(means.len(), 3);
        assert_eq!(means.get(&d(1, 1)), Some(Some(15.0)));
        assert_eq!(means.get(&d(1, 2)), Some(None));
        assert_eq!(means.get(&d(1, 3)), Some(None));
        assert_eq!(means.missing_count(), 2);
    }

    #[tokio::test]
    async fn test_client_non_success_status_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable\n"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .await
            .daily_means(&january_request())
            .await;

        match result {
            Err(EtlError::WeatherStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "service unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_malformed_body_is_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"daily\": 7}"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .await
            .daily_means(&january_request())
            .await;

        assert!(matches!(result, Err(EtlError::Json(_))));
    }

    #[tokio::test]
    async fn test_client_unreachable_source_is_weather_error() {
        let server = MockServer::start().await;
        let url = format!("{}{}", server.uri(), FORECAST_PATH);
        drop(server);

        let result = OpenMeteoClient::new(url)
            .unwrap()
            .daily_means(&january_request())
            .await;

        assert!(matches!(result, Err(EtlError::Weather(_))));
    }
}
