//! Categorical encoding implementations

use crate::error::{PrepError, Result};
use super::{ensure_columns, string_column, TableTransformer};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Sorted distinct observed values of a column
fn learn_categories(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let ca = string_column(df, column)?;
    let categories: BTreeSet<String> = ca
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect();
    Ok(categories.into_iter().collect())
}

/// Encodes a two-valued category as 0/1.
///
/// The first category in lexicographic order maps to 0, the second to 1. The
/// ordering is learned once and reused for every later table; a value outside
/// the learned pair is rejected with [`PrepError::UnknownCategory`]. Absent
/// values have no code, so fitting on a column that still has them fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryEncoder {
    columns: Vec<String>,
    categories: Vec<(String, [String; 2])>,
    is_fitted: bool,
}

impl BinaryEncoder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learned `[zero, one]` categories for a column
    pub fn categories(&self, column: &str) -> Option<&[String; 2]> {
        self.categories
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cats)| cats)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn encode_series(&self, df: &DataFrame, column: &str, cats: &[String; 2]) -> Result<Series> {
        let ca = &string_column(df, column)?;
        let mut values = Vec::with_capacity(ca.len());
        for value in ca.into_iter() {
            let code = match value {
                Some(v) if v == cats[0] => 0.0,
                Some(v) if v == cats[1] => 1.0,
                other => {
                    return Err(PrepError::UnknownCategory {
                        column: column.to_string(),
                        category: other.unwrap_or("<absent>").to_string(),
                    })
                }
            };
            values.push(code);
        }
        Ok(Series::new(column.into(), values))
    }
}

impl TableTransformer for BinaryEncoder {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        ensure_columns(df, &self.columns)?;

        let mut learned = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let absent = df.column(column)?.null_count();
            if absent > 0 {
                return Err(PrepError::InvalidInput(format!(
                    "column '{}' has {} absent values; fill them (not_applicable) before binary encoding",
                    column, absent
                )));
            }
            let categories = learn_categories(df, column)?;
            let pair: [String; 2] = categories.try_into().map_err(|cats: Vec<String>| {
                PrepError::InvalidInput(format!(
                    "column '{}' has {} distinct values, binary encoding needs exactly 2",
                    column,
                    cats.len()
                ))
            })?;
            debug!(column = %column, zero = %pair[0], one = %pair[1], "binary encoder fitted");
            learned.push((column.clone(), pair));
        }

        self.categories = learned;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mut result = df.clone();
        for (column, cats) in &self.categories {
            let encoded = self.encode_series(df, column, cats)?;
            result.with_column(encoded)?;
        }
        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn name(&self) -> &'static str {
        "binary_encode"
    }
}

/// One indicator column per learned category.
///
/// Categories are sorted at fit time and that order fixes the output layout.
/// Unseen or absent values produce an all-zero indicator row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<String>,
    categories: Vec<(String, Vec<String>)>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learned categories of a column, in output order
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cats)| cats.as_slice())
    }

    /// Indicator column name for a category
    pub fn indicator_name(column: &str, category: &str) -> String {
        format!("{}_{}", column, category)
    }

    /// All indicator columns emitted, in output order
    pub fn output_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|(column, cats)| cats.iter().map(move |c| Self::indicator_name(column, c)))
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl TableTransformer for OneHotEncoder {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.is_fitted {
            return Err(PrepError::AlreadyFitted);
        }
        ensure_columns(df, &self.columns)?;

        let mut learned = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let categories = learn_categories(df, column)?;
            if categories.is_empty() {
                return Err(PrepError::EmptyInput(column.clone()));
            }
            debug!(column = %column, n_categories = categories.len(), "one-hot encoder fitted");
            learned.push((column.clone(), categories));
        }

        self.categories = learned;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mut result = df.clone();
        for (column, cats) in &self.categories {
            let ca = &string_column(df, column)?;

            let unknown = ca
                .into_iter()
                .filter(|v| v.map_or(true, |s| cats.binary_search_by(|c| c.as_str().cmp(s)).is_err()))
                .count();
            if unknown > 0 {
                warn!(column = %column, rows = unknown, "unseen categories encoded as all-zero rows");
            }

            for category in cats {
                let values: Vec<f64> = ca
                    .into_iter()
                    .map(|v| if v == Some(category.as_str()) { 1.0 } else { 0.0 })
                    .collect();
                let indicator = Series::new(Self::indicator_name(column, category).into(), values);
                result.with_column(indicator)?;
            }

            result = result.drop(column)?;
        }

        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn name(&self) -> &'static str {
        "one_hot_encode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_encoding_order() {
        let train = df!("CentralAir" => &["Y", "N", "Y", "Y"]).unwrap();
        let mut encoder = BinaryEncoder::new(["CentralAir"]);
        let result = encoder.fit_transform(&train).unwrap();

        assert_eq!(
            encoder.categories("CentralAir"),
            Some(&["N".to_string(), "Y".to_string()])
        );
        let col = result.column("CentralAir").unwrap().f64().unwrap();
        assert_eq!(col.get(0), Some(1.0));
        assert_eq!(col.get(1), Some(0.0));
    }

    #[test]
    fn test_binary_reuses_order_on_held_out() {
        let train = df!("CentralAir" => &["Y", "N"]).unwrap();
        let mut encoder = BinaryEncoder::new(["CentralAir"]);
        encoder.fit(&train).unwrap();

        // Held-out data containing only "Y" must still map Y -> 1
        let held_out = df!("CentralAir" => &["Y", "Y"]).unwrap();
        let result = encoder.transform(&held_out).unwrap();
        let col = result.column("CentralAir").unwrap().f64().unwrap();
        assert_eq!(col.get(0), Some(1.0));
    }

    #[test]
    fn test_binary_rejects_three_values() {
        let df = df!("Street" => &["Pave", "Grvl", "Dirt"]).unwrap();
        let mut encoder = BinaryEncoder::new(["Street"]);
        assert!(matches!(encoder.fit(&df), Err(PrepError::InvalidInput(_))));
    }

    #[test]
    fn test_binary_unknown_category() {
        let mut encoder = BinaryEncoder::new(["Street"]);
        encoder.fit(&df!("Street" => &["Pave", "Grvl"]).unwrap()).unwrap();
        let err = encoder
            .transform(&df!("Street" => &["Dirt"]).unwrap())
            .unwrap_err();
        assert!(matches!(err, PrepError::UnknownCategory { category, .. } if category == "Dirt"));
    }

    #[test]
    fn test_binary_rejects_absent_at_fit() {
        let df = df!("CentralAir" => &[Some("Y"), None, Some("N")]).unwrap();
        let mut encoder = BinaryEncoder::new(["CentralAir"]);
        assert!(matches!(
            encoder.fit(&df),
            Err(PrepError::InvalidInput(msg)) if msg.contains("absent")
        ));
        assert!(!encoder.is_fitted());
    }

    #[test]
    fn test_onehot_encoding() {
        let df = df!("Neighborhood" => &["NAmes", "CollgCr", "OldTown", "NAmes"]).unwrap();
        let mut encoder = OneHotEncoder::new(["Neighborhood"]);
        let result = encoder.fit_transform(&df).unwrap();

        assert!(result.column("Neighborhood").is_err());
        assert_eq!(result.width(), 3);
        assert_eq!(
            encoder.output_names(),
            vec!["Neighborhood_CollgCr", "Neighborhood_NAmes", "Neighborhood_OldTown"]
        );
        let names = result.column("Neighborhood_NAmes").unwrap().f64().unwrap();
        assert_eq!(names.get(0), Some(1.0));
        assert_eq!(names.get(1), Some(0.0));
    }

    #[test]
    fn test_onehot_ignores_unknown() {
        let train = df!("Neighborhood" => &["NAmes", "CollgCr"]).unwrap();
        let mut encoder = OneHotEncoder::new(["Neighborhood"]);
        encoder.fit(&train).unwrap();

        let held_out = df!("Neighborhood" => &[Some("Blmngtn"), Some("CollgCr"), None]).unwrap();
        let result = encoder.transform(&held_out).unwrap();

        assert_eq!(encoder.categories("Neighborhood").unwrap(), ["CollgCr", "NAmes"]);
        // Unseen and absent rows both encode as all zeros
        for name in encoder.output_names() {
            let col = result.column(&name).unwrap().f64().unwrap();
            assert_eq!(col.get(0), Some(0.0));
            assert_eq!(col.get(2), Some(0.0));
        }
        let collg = result.column("Neighborhood_CollgCr").unwrap().f64().unwrap();
        assert_eq!(collg.get(1), Some(1.0));
    }
}
