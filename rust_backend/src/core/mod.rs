//! Core domain models for the retail ETL.
//!
//! This module defines the fundamental data structures used throughout the
//! pipeline: the product catalog, transactions and the derived daily tables.

pub mod catalog;
pub mod domain;
