//! Persistence of the pipeline's tabular artifacts.
//!
//! [`writers`] turns the enriched transactions and the filtered daily series
//! into CSV files; [`loaders`] reads them back into typed rows.
//!
//! # Example
//!
//! ```no_run
//! use retail_etl::io::loaders::ArtifactLoader;
//! use std::path::Path;
//!
//! let series = ArtifactLoader::load_model_series(Path::new("data_modelo.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} days", series.len());
//! ```

pub mod loaders;
pub mod writers;

pub use loaders::ArtifactLoader;
pub use writers::{write_model_series_csv, write_transactions_csv, CsvSink};
