//! Weather data acquisition.

pub mod source;

pub use source::{DateRange, OpenMeteoClient, WeatherRequest, WeatherSource};
