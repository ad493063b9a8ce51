//! Data preprocessing module
//!
//! Every component follows the same convention: it is constructed with the
//! columns it owns, fit exactly once on training data, and then applied
//! (without re-fitting) to training and held-out tables alike.
//!
//! - [`ColumnSelector`] - narrow a table to the relevant fields
//! - [`MissingValueHandler`] - missing-value indicator plus median fill
//! - [`BinaryEncoder`] / [`OneHotEncoder`] - categorical encoding
//! - [`Standardizer`] - zero mean, unit variance scaling
//! - [`PreprocessingPipeline`] - ordered chain of the above

mod config;
mod selector;
mod imputer;
mod encoder;
mod scaler;
mod pipeline;

pub use config::PipelineConfig;
pub use selector::ColumnSelector;
pub use imputer::{MissingValueHandler, ImputeStrategy};
pub use encoder::{BinaryEncoder, OneHotEncoder};
pub use scaler::Standardizer;
pub use pipeline::{PipelineStep, PreprocessingPipeline};

use crate::error::{PrepError, Result};
use polars::prelude::*;

/// Fit/transform contract shared by every table transformer.
pub trait TableTransformer {
    /// Learn state from training data. Fails with [`PrepError::AlreadyFitted`]
    /// if state was already learned.
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    /// Apply the learned state to any table.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Whether `fit` has completed
    fn is_fitted(&self) -> bool;

    /// Short step name used in logs and metrics
    fn name(&self) -> &'static str;
}

/// Check if dtype is numeric
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Fetch a column as `Float64`, casting integer and boolean columns.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| PrepError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series();

    if !is_numeric_dtype(series.dtype()) && series.dtype() != &DataType::Boolean {
        return Err(PrepError::ValueConversion {
            column: name.to_string(),
            reason: format!("dtype {} is not numeric", series.dtype()),
        });
    }

    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Fetch a column as strings. Numeric category codes are cast to their
/// textual form.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .map_err(|_| PrepError::FeatureNotFound(name.to_string()))?;
    let casted = column.as_materialized_series().cast(&DataType::String)?;
    Ok(casted.str()?.clone())
}

pub(crate) fn ensure_columns(df: &DataFrame, columns: &[String]) -> Result<()> {
    for name in columns {
        if df.column(name).is_err() {
            return Err(PrepError::FeatureNotFound(name.clone()));
        }
    }
    Ok(())
}
