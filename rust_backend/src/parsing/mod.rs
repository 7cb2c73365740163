//! Parsers for the pipeline's input and output formats.
//!
//! # Parsers
//!
//! - [`weather_json`]: Decode the weather provider's `daily` response block
//! - [`csv_parser`]: Convert tables to and from DataFrames and CSV files
//!
//! # Example
//!
//! ```
//! use retail_etl::parsing::weather_json::parse_forecast_json_str;
//!
//! let json = r#"{"daily": {
//!     "time": ["2025-01-01"],
//!     "temperature_2m_max": [21.0],
//!     "temperature_2m_min": [9.0]
//! }}"#;
//! let means = parse_forecast_json_str(json).unwrap();
//! assert_eq!(means.len(), 1);
//! ```

pub mod csv_parser;
pub mod weather_json;
