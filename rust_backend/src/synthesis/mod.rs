//! Deterministic synthetic data generation.

pub mod draws;
pub mod generator;

pub use draws::DrawSequence;
pub use generator::{count_by_date, distribute_sales, GeneratedData, SyntheticGenerator};
