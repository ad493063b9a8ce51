//! Conversion of preprocessed tables into `ndarray` inputs for the model

use crate::error::{PrepError, Result};
use crate::preprocessing::float_column;
use ndarray::{Array1, Array2};
use polars::prelude::*;

fn dense_column(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let ca = float_column(df, column)?;
    if ca.null_count() > 0 {
        return Err(PrepError::ValueConversion {
            column: column.to_string(),
            reason: format!("{} absent values", ca.null_count()),
        });
    }
    Ok(ca.into_iter().flatten().collect())
}

/// Build an `(n_rows, columns.len())` matrix.
///
/// Fails with [`PrepError::ValueConversion`] when a column is not numeric or
/// still holds absent values: the preceding preprocessing is incomplete.
pub fn to_feature_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let mut matrix = Array2::zeros((df.height(), columns.len()));
    for (j, column) in columns.iter().enumerate() {
        let values = dense_column(df, column)?;
        matrix.column_mut(j).assign(&Array1::from(values));
    }
    Ok(matrix)
}

/// Extract the regression target as a dense vector
pub fn target_vector(df: &DataFrame, column: &str) -> Result<Array1<f64>> {
    Ok(Array1::from(dense_column(df, column)?))
}
