//! Column selection

use crate::error::{PrepError, Result};
use super::{ensure_columns, TableTransformer};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Narrows a table to a fixed, ordered subset of columns.
///
/// Input dtypes are recorded at fit. A later table whose column holds only
/// absent values (a CSV reader infers those as text) is cast back to the
/// fit-time dtype so downstream steps see the same schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSelector {
    columns: Vec<String>,
    #[serde(skip)]
    dtypes: Vec<(String, DataType)>,
    is_fitted: bool,
}

impl ColumnSelector {
    /// Create a selector for the given columns. Duplicates keep their first
    /// position.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for col in columns {
            let col = col.into();
            if !unique.contains(&col) {
                unique.push(col);
            }
        }
        Self {
            columns: unique,
            dtypes: Vec::new(),
            is_fitted: false,
        }
    }

    /// Selected columns in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl TableTransformer for ColumnSelector {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        ensure_columns(df, &self.columns)?;
        let mut dtypes = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            dtypes.push((column.clone(), df.column(column)?.dtype().clone()));
        }
        self.dtypes = dtypes;
        self.is_fitted = true;
        debug!(columns = self.columns.len(), "column selector fitted");
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }
        ensure_columns(df, &self.columns)?;
        let mut result = df.select(self.columns.iter().map(|s| s.as_str()))?;

        for (column, dtype) in &self.dtypes {
            let current = result.column(column)?;
            if current.dtype() != dtype && current.null_count() == current.len() {
                let restored = current.cast(dtype)?;
                debug!(column = %column, dtype = %dtype, "all-absent column cast to fit-time dtype");
                result.with_column(restored)?;
            }
        }
        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn name(&self) -> &'static str {
        "select"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "Id" => &[1i64, 2, 3],
            "LotArea" => &[8450.0, 9600.0, 11250.0],
            "Street" => &["Pave", "Pave", "Grvl"],
            "PoolQC" => &["Gd", "Ex", "Fa"],
        )
        .unwrap()
    }

    #[test]
    fn test_select_keeps_order() {
        let mut selector = ColumnSelector::new(["Street", "LotArea", "Street"]);
        let out = selector.fit_transform(&sample_df()).unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Street", "LotArea"]);
    }

    #[test]
    fn test_missing_column_fails() {
        let mut selector = ColumnSelector::new(["Alley"]);
        assert!(matches!(
            selector.fit(&sample_df()),
            Err(PrepError::FeatureNotFound(name)) if name == "Alley"
        ));
    }

    #[test]
    fn test_all_absent_column_keeps_fit_dtype() {
        let train = df!(
            "LotFrontage" => &[Some(65.0), None, Some(80.0)],
            "Street" => &["Pave", "Pave", "Grvl"],
        )
        .unwrap();
        let held_out = df!(
            "LotFrontage" => &[None::<&str>, None],
            "Street" => &["Pave", "Grvl"],
        )
        .unwrap();

        let mut selector = ColumnSelector::new(["LotFrontage", "Street"]);
        selector.fit(&train).unwrap();
        let out = selector.transform(&held_out).unwrap();

        let frontage = out.column("LotFrontage").unwrap();
        assert_eq!(frontage.dtype(), &DataType::Float64);
        assert_eq!(frontage.null_count(), 2);
        assert_eq!(out.column("Street").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_refit_rejected() {
        let mut selector = ColumnSelector::new(["LotArea"]);
        selector.fit(&sample_df()).unwrap();
        assert!(matches!(selector.fit(&sample_df()), Err(PrepError::AlreadyFitted)));
    }
}
