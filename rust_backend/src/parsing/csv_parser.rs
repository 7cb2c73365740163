use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

use crate::core::catalog::Category;
use crate::core::domain::{ModelPoint, Transaction};

/// Column order of the transaction artifact
pub const TRANSACTION_COLUMNS: [&str; 7] = [
    "id",
    "date",
    "product_id",
    "price",
    "category",
    "sales",
    "temp_media",
];

/// Column order of the model series artifact
pub const MODEL_SERIES_COLUMNS: [&str; 2] = ["ds", "y"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a CSV file into a Polars DataFrame, casting known columns to their expected types
pub fn parse_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", csv_path.display()))?;

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut lazy_df = df.lazy();

    // Integer columns may be inferred as i64 already; all-empty columns come back as strings
    for col_name in ["id", "product_id"] {
        if column_names.iter().any(|c| c == col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::Int64));
        }
    }

    for col_name in ["price", "sales", "temp_media", "y"] {
        if column_names.iter().any(|c| c == col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::Float64));
        }
    }

    for col_name in ["date", "ds", "category"] {
        if column_names.iter().any(|c| c == col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::String));
        }
    }

    let df = lazy_df
        .collect()
        .context("Failed to cast columns to expected types")?;

    Ok(df)
}

/// Convert transactions to a DataFrame with the artifact's column order
pub fn transactions_to_dataframe(transactions: &[Transaction]) -> PolarsResult<DataFrame> {
    let n = transactions.len();

    let mut ids = Vec::with_capacity(n);
    let mut dates = Vec::with_capacity(n);
    let mut product_ids = Vec::with_capacity(n);
    let mut prices = Vec::with_capacity(n);
    let mut categories = Vec::with_capacity(n);
    let mut sales = Vec::with_capacity(n);
    let mut temps = Vec::with_capacity(n);

    for tx in transactions {
        ids.push(tx.id);
        dates.push(tx.date.format(DATE_FORMAT).to_string());
        product_ids.push(tx.product_id);
        prices.push(tx.price);
        categories.push(tx.category.label().to_string());
        sales.push(tx.sales);
        temps.push(tx.temp_media);
    }

    let df = df!(
        "id" => ids,
        "date" => dates,
        "product_id" => product_ids,
        "price" => prices,
        "category" => categories,
        "sales" => sales,
        "temp_media" => temps,
    )?;

    Ok(df)
}

/// Convert the model series to a two-column (`ds`, `y`) DataFrame
pub fn model_series_to_dataframe(series: &[ModelPoint]) -> PolarsResult<DataFrame> {
    let ds: Vec<String> = series
        .iter()
        .map(|p| p.ds.format(DATE_FORMAT).to_string())
        .collect();
    let y: Vec<f64> = series.iter().map(|p| p.y).collect();

    let df = df!(
        "ds" => ds,
        "y" => y,
    )?;

    Ok(df)
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}' at row {}", value, row))
}

/// Convert a DataFrame (as produced by [`parse_csv`]) back to transactions
pub fn dataframe_to_transactions(df: &DataFrame) -> Result<Vec<Transaction>> {
    let ids = df.column("id")?.i64()?;
    let dates = df.column("date")?.str()?;
    let product_ids = df.column("product_id")?.i64()?;
    let prices = df.column("price")?.f64()?;
    let categories = df.column("category")?.str()?;
    let sales = df.column("sales")?.f64()?;
    let temps = df.column("temp_media").ok().and_then(|c| c.f64().ok());

    let mut transactions = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let id = ids
            .get(i)
            .with_context(|| format!("Missing id at row {}", i))?;
        let date = dates
            .get(i)
            .with_context(|| format!("Missing date at row {}", i))?;
        let product_id = product_ids
            .get(i)
            .with_context(|| format!("Missing product_id at row {}", i))?;
        let category = categories
            .get(i)
            .with_context(|| format!("Missing category at row {}", i))?
            .parse::<Category>()
            .map_err(anyhow::Error::msg)?;

        transactions.push(Transaction {
            id: u32::try_from(id).with_context(|| format!("Invalid id {} at row {}", id, i))?,
            date: parse_date(date, i)?,
            product_id: u32::try_from(product_id)
                .with_context(|| format!("Invalid product_id {} at row {}", product_id, i))?,
            price: prices
                .get(i)
                .with_context(|| format!("Missing price at row {}", i))?,
            category,
            sales: sales
                .get(i)
                .with_context(|| format!("Missing sales at row {}", i))?,
            temp_media: temps.and_then(|col| col.get(i)),
        });
    }

    Ok(transactions)
}

/// Convert a (`ds`, `y`) DataFrame back to the model series
pub fn dataframe_to_model_series(df: &DataFrame) -> Result<Vec<ModelPoint>> {
    let ds = df.column("ds")?.str()?;
    let y = df.column("y")?.f64()?;

    (0..df.height())
        .map(|i| {
            let date = ds
                .get(i)
                .with_context(|| format!("Missing ds at row {}", i))?;
            let value = y
                .get(i)
                .with_context(|| format!("Missing y at row {}", i))?;
            Ok(ModelPoint::new(parse_date(date, i)?, value))
        })
        .collect()
}
