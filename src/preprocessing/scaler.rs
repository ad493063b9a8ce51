//! Standard scaling: (x - mean) / std

use crate::error::{PrepError, Result};
use super::{ensure_columns, float_column, TableTransformer};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    scale: f64,
}

/// Per-column standardizer.
///
/// Learns mean and population standard deviation (ddof = 0) on the fitting
/// data. A zero-variance column is only centered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standardizer {
    columns: Vec<String>,
    params: Vec<(String, ScalerParams)>,
    is_fitted: bool,
}

impl Standardizer {
    /// Create a new standardizer
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            params: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learned `(mean, scale)` for a column
    pub fn params(&self, column: &str) -> Option<(f64, f64)> {
        self.params
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, p)| (p.mean, p.scale))
    }

    /// Inverse transform the data
    pub fn inverse_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mut result = df.clone();
        for (column, params) in &self.params {
            let unscaled: Float64Chunked = float_column(df, column)?
                .into_iter()
                .map(|opt| opt.map(|v| v * params.scale + params.mean))
                .collect();
            result.with_column(unscaled.with_name(column.as_str().into()).into_series())?;
        }
        Ok(result)
    }

    fn compute_params(df: &DataFrame, column: &str) -> Result<ScalerParams> {
        let ca = float_column(df, column)?;
        let mean = ca
            .mean()
            .ok_or_else(|| PrepError::EmptyInput(column.to_string()))?;
        let std = ca.std(0).unwrap_or(0.0);

        let scale = if std == 0.0 || !std.is_finite() {
            warn!(column = %column, "zero variance column; centering only");
            1.0
        } else {
            std
        };

        Ok(ScalerParams { mean, scale })
    }

    fn scale_series(df: &DataFrame, column: &str, params: &ScalerParams) -> Result<Series> {
        let scaled: Float64Chunked = float_column(df, column)?
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.mean) / params.scale))
            .collect();

        Ok(scaled.with_name(column.into()).into_series())
    }
}

impl TableTransformer for Standardizer {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        ensure_columns(df, &self.columns)?;

        let mut params = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let p = Self::compute_params(df, column)?;
            debug!(column = %column, mean = p.mean, scale = p.scale, "standardizer fitted");
            params.push((column.clone(), p));
        }

        self.params = params;
        self.is_fitted = true;
        Ok(())
    }

    /// Builds all replacement columns first, then applies them.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .map(|(column, params)| Self::scale_series(df, column, params))
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }
        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn name(&self) -> &'static str {
        "standardize"
    }
}
