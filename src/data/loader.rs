//! Data loading utilities

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Load a CSV table. The literal `NA` is read as an absent value.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext != "csv" {
        return Err(PrepError::InvalidInput(format!("Unsupported file format: {}", ext)));
    }

    let start = Instant::now();
    let parse_options = CsvParseOptions::default()
        .with_null_values(Some(NullValues::AllColumns(vec!["NA".into()])));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "table loaded"
    );
    Ok(df)
}

/// Check that `key` identifies every row: present, never absent, unique.
pub fn validate_key(df: &DataFrame, key: &str) -> Result<()> {
    let column = df
        .column(key)
        .map_err(|_| PrepError::FeatureNotFound(key.to_string()))?;

    if column.null_count() > 0 {
        return Err(PrepError::InvalidInput(format!(
            "key column '{}' has {} absent values",
            key,
            column.null_count()
        )));
    }

    let unique = column.as_materialized_series().n_unique()?;
    if unique != df.height() {
        return Err(PrepError::InvalidInput(format!(
            "key column '{}' has {} duplicate values",
            key,
            df.height() - unique
        )));
    }
    Ok(())
}

/// Columns with absent values and their counts, in table order
pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .filter(|c| c.null_count() > 0)
        .map(|c| (c.name().to_string(), c.null_count()))
        .collect()
}
