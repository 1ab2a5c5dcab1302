//! Column extraction helpers for long tables.
//!
//! Stages read whole columns out of a DataFrame, work row by row in plain
//! vectors, and build a fresh DataFrame for the next stage.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use labor_ingest::{any_to_f64, any_to_string};

use crate::error::{Result, TransformError};

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::MissingColumn {
        column: name.to_string(),
    })
}

/// Extract a string column, trimming values. Nulls become empty strings.
///
/// Non-string columns are rendered cell by cell.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = column(df, name)?;
    if let Ok(values) = column.str() {
        return Ok(values
            .into_iter()
            .map(|value| value.map(|v| v.trim().to_string()).unwrap_or_default())
            .collect());
    }
    let series = column.as_materialized_series().rechunk();
    Ok(series
        .iter()
        .map(|value| any_to_string(value).trim().to_string())
        .collect())
}

/// Extract a numeric column, keeping nulls as `None`.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = column(df, name)?;
    if let Ok(values) = column.f64() {
        return Ok(values.into_iter().collect());
    }
    let series = column.as_materialized_series().rechunk();
    Ok(series.iter().map(any_to_f64).collect())
}

/// Build a string column.
pub fn string_column(name: &str, values: Vec<String>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Build a nullable numeric column.
pub fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}
