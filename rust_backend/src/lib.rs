//! Retail ETL - synthetic transactions enriched with daily weather and reduced
//! to an outlier-free daily sales series.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod synthesis;
pub mod transformations;
pub mod weather;

pub use config::EtlConfig;
pub use error::{EtlError, EtlResult};
pub use preprocessing::{EtlPipeline, PipelineReport};
