//! Missing value handling: absence indicators plus statistic or label fill

use crate::error::{PrepError, Result};
use super::{ensure_columns, float_column, string_column, TableTransformer};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strategy for filling absent values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with median of observed training values
    Median,
    /// Replace with mean of observed training values
    Mean,
    /// Replace with a constant number
    Constant(f64),
    /// Replace with a constant label, for columns where absence means
    /// "not applicable" rather than "unknown"
    ConstantLabel(String),
}

impl Default for ImputeStrategy {
    fn default() -> Self {
        ImputeStrategy::Median
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum FillValue {
    Numeric(f64),
    Label(String),
}

/// Flags originally-absent rows and fills them with a value learned at fit
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingValueHandler {
    strategy: ImputeStrategy,
    columns: Vec<String>,
    add_indicator: bool,
    fill_values: Vec<(String, FillValue)>,
    is_fitted: bool,
}

impl MissingValueHandler {
    /// Create a handler with the given strategy. Indicator columns are added
    /// for numeric strategies and omitted for label fills.
    pub fn new<I, S>(strategy: ImputeStrategy, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let add_indicator = !matches!(strategy, ImputeStrategy::ConstantLabel(_));
        Self {
            strategy,
            columns: columns.into_iter().map(Into::into).collect(),
            add_indicator,
            fill_values: Vec::new(),
            is_fitted: false,
        }
    }

    /// Median fill with a `<col>_missing` indicator per column
    pub fn median<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ImputeStrategy::Median, columns)
    }

    /// Constant-label fill for "not applicable" categorical columns
    pub fn not_applicable<I, S>(columns: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ImputeStrategy::ConstantLabel(label.into()), columns)
    }

    /// Enable or disable the indicator columns
    pub fn with_indicator(mut self, add_indicator: bool) -> Self {
        self.add_indicator = add_indicator;
        self
    }

    /// Name of the indicator column emitted for `column`
    pub fn indicator_name(column: &str) -> String {
        format!("{}_missing", column)
    }

    /// Indicator columns this handler emits, in column order
    pub fn indicator_columns(&self) -> Vec<String> {
        if !self.add_indicator {
            return Vec::new();
        }
        self.columns.iter().map(|c| Self::indicator_name(c)).collect()
    }

    /// Learned numeric fill value for a column
    pub fn fill_value(&self, column: &str) -> Option<f64> {
        self.fill_values.iter().find_map(|(name, value)| match value {
            FillValue::Numeric(v) if name == column => Some(*v),
            _ => None,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn compute_fill_value(&self, df: &DataFrame, column: &str) -> Result<FillValue> {
        if df.height() == 0 {
            return Err(PrepError::EmptyInput(column.to_string()));
        }

        match &self.strategy {
            ImputeStrategy::Median | ImputeStrategy::Mean => {
                let ca = float_column(df, column)?;
                let stat = if self.strategy == ImputeStrategy::Median {
                    ca.median()
                } else {
                    ca.mean()
                };
                stat.map(FillValue::Numeric)
                    .ok_or_else(|| PrepError::EmptyInput(column.to_string()))
            }
            ImputeStrategy::Constant(val) => Ok(FillValue::Numeric(*val)),
            ImputeStrategy::ConstantLabel(label) => Ok(FillValue::Label(label.clone())),
        }
    }

    fn fill_series(&self, df: &DataFrame, column: &str, fill_value: &FillValue) -> Result<Series> {
        match fill_value {
            FillValue::Numeric(val) => {
                let filled: Float64Chunked = float_column(df, column)?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();
                Ok(filled.with_name(column.into()).into_series())
            }
            FillValue::Label(label) => {
                let filled: StringChunked = string_column(df, column)?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(label.as_str())))
                    .collect();
                Ok(filled.with_name(column.into()).into_series())
            }
        }
    }
}

impl TableTransformer for MissingValueHandler {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        ensure_columns(df, &self.columns)?;

        let mut fill_values = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = self.compute_fill_value(df, column)?;
            debug!(column = %column, fill = ?value, "missing value handler fitted");
            fill_values.push((column.clone(), value));
        }

        self.fill_values = fill_values;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mut result = df.clone();
        for (column, fill_value) in &self.fill_values {
            let original = df
                .column(column)
                .map_err(|_| PrepError::FeatureNotFound(column.clone()))?;

            if self.add_indicator {
                let flags = original
                    .as_materialized_series()
                    .is_null()
                    .with_name(Self::indicator_name(column).into())
                    .into_series();
                result.with_column(flags)?;
            }

            let filled = self.fill_series(df, column, fill_value)?;
            result.with_column(filled)?;
        }

        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn name(&self) -> &'static str {
        "impute"
    }
}
