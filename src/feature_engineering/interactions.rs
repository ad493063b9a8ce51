//! Feature interaction generation

use crate::error::{PrepError, Result};
use crate::preprocessing::{float_column, TableTransformer};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature interaction pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCrossing {
    /// First feature name
    pub feature_a: String,
    /// Second feature name
    pub feature_b: String,
}

impl FeatureCrossing {
    /// Output column name, `a*b`
    pub fn name(&self) -> String {
        format!("{}*{}", self.feature_a, self.feature_b)
    }
}

/// Appends every pairwise product (no squares) of a fixed column list.
///
/// Original columns are kept untouched. For `k` inputs the expanded set has
/// `k + k * (k - 1) / 2` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionExpander {
    columns: Vec<String>,
    crossings: Option<Vec<FeatureCrossing>>,
}

impl InteractionExpander {
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
            crossings: None,
        }
    }

    /// Generate all feature pairs `(i, j)` with `i < j`. Repeated names are
    /// collapsed first so no column is ever multiplied by itself.
    fn generate_crossings(columns: &[String]) -> Vec<FeatureCrossing> {
        let mut unique: Vec<&String> = Vec::with_capacity(columns.len());
        for col in columns {
            if !unique.contains(&col) {
                unique.push(col);
            }
        }
        let columns = unique;

        let mut crossings = Vec::new();
        for i in 0..columns.len() {
            for j in (i + 1)..columns.len() {
                crossings.push(FeatureCrossing {
                    feature_a: columns[i].clone(),
                    feature_b: columns[j].clone(),
                });
            }
        }
        crossings
    }

    /// Product column names for a column list, without fitting
    pub fn product_names(columns: &[String]) -> Vec<String> {
        Self::generate_crossings(columns)
            .iter()
            .map(FeatureCrossing::name)
            .collect()
    }

    /// Originals followed by products
    pub fn output_names(&self) -> Vec<String> {
        let mut names = self.columns.clone();
        names.extend(Self::product_names(&self.columns));
        names
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl TableTransformer for InteractionExpander {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.crossings.is_some() {
            return Err(PrepError::AlreadyFitted);
        }
        for column in &self.columns {
            // Checks presence and numeric dtype
            float_column(df, column)?;
        }

        let crossings = Self::generate_crossings(&self.columns);
        debug!(inputs = self.columns.len(), products = crossings.len(), "interaction expander fitted");
        self.crossings = Some(crossings);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let crossings = self.crossings.as_ref().ok_or(PrepError::NotFitted)?;

        let mut result = df.clone();
        for crossing in crossings {
            let a = float_column(df, &crossing.feature_a)?;
            let b = float_column(df, &crossing.feature_b)?;
            let product: Float64Chunked = a
                .into_iter()
                .zip(b.into_iter())
                .map(|(x, y)| match (x, y) {
                    (Some(x), Some(y)) => Some(x * y),
                    _ => None,
                })
                .collect();
            result.with_column(product.with_name(crossing.name().into()).into_series())?;
        }

        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.crossings.is_some()
    }

    fn name(&self) -> &'static str {
        "interactions"
    }
}
