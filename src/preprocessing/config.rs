//! Pipeline configuration

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declares which columns play which role in the walkthrough.
///
/// Loadable from JSON; missing fields take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stable row key, never used as a feature
    pub key_column: Option<String>,

    /// Regression target
    pub target_column: String,

    /// Continuous features; these (and their interaction products) are
    /// standardized
    pub numeric: Vec<String>,

    /// Numeric columns with absent values: indicator column plus median fill
    pub impute_median: Vec<String>,

    /// Categorical columns where absence means "does not apply"
    pub not_applicable: Vec<String>,

    /// Label written into `not_applicable` columns
    pub not_applicable_label: String,

    /// Two-valued categorical columns encoded as 0/1
    pub binary: Vec<String>,

    /// Multi-valued categorical columns encoded as indicator columns
    pub one_hot: Vec<String>,

    /// Numeric columns whose pairwise products are added
    pub interactions: Vec<String>,

    /// L2 penalty of the downstream ridge regressor
    pub ridge_alpha: f64,

    /// Share of rows held out when splitting a single table
    pub test_fraction: f64,

    /// Random seed for reproducibility
    pub random_state: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key_column: Some("Id".to_string()),
            target_column: "SalePrice".to_string(),
            numeric: Vec::new(),
            impute_median: Vec::new(),
            not_applicable: Vec::new(),
            not_applicable_label: "None".to_string(),
            binary: Vec::new(),
            one_hot: Vec::new(),
            interactions: Vec::new(),
            ridge_alpha: 1.0,
            test_fraction: 0.2,
            random_state: Some(42),
        }
    }
}

fn ensure_subset(role: &str, columns: &[String], of: &[&Vec<String>], of_name: &str) -> Result<()> {
    for c in columns {
        if !of.iter().any(|set| set.contains(c)) {
            return Err(PrepError::ConfigError(format!(
                "{} column '{}' is not declared {}",
                role, c, of_name
            )));
        }
    }
    Ok(())
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Column roles for the bundled housing sample (`data/housing_sample.csv`)
    pub fn housing() -> Self {
        Self::default()
            .with_numeric(&["LotFrontage", "LotArea", "OverallQual", "GrLivArea", "YearBuilt"])
            .with_impute_median(&["LotFrontage"])
            .with_not_applicable(&["Alley"])
            .with_binary(&["CentralAir"])
            .with_one_hot(&["Neighborhood", "Alley"])
            .with_interactions(&["OverallQual", "GrLivArea", "LotArea"])
    }

    /// Builder method to set the target column
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    /// Builder method to set the key column
    pub fn with_key(mut self, key: Option<&str>) -> Self {
        self.key_column = key.map(str::to_string);
        self
    }

    pub fn with_numeric(mut self, columns: &[&str]) -> Self {
        self.numeric = strings(columns);
        self
    }

    pub fn with_impute_median(mut self, columns: &[&str]) -> Self {
        self.impute_median = strings(columns);
        self
    }

    pub fn with_not_applicable(mut self, columns: &[&str]) -> Self {
        self.not_applicable = strings(columns);
        self
    }

    pub fn with_binary(mut self, columns: &[&str]) -> Self {
        self.binary = strings(columns);
        self
    }

    pub fn with_one_hot(mut self, columns: &[&str]) -> Self {
        self.one_hot = strings(columns);
        self
    }

    pub fn with_interactions(mut self, columns: &[&str]) -> Self {
        self.interactions = strings(columns);
        self
    }

    /// Builder method to set ridge regularization strength
    pub fn with_ridge_alpha(mut self, alpha: f64) -> Self {
        self.ridge_alpha = alpha;
        self
    }

    /// Builder method to set the held-out share and seed
    pub fn with_split(mut self, test_fraction: f64, random_state: Option<u64>) -> Self {
        self.test_fraction = test_fraction;
        self.random_state = random_state;
        self
    }

    /// Every column the selector keeps, in declaration order, duplicates
    /// removed
    pub fn feature_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for name in self
            .numeric
            .iter()
            .chain(&self.binary)
            .chain(&self.one_hot)
            .chain(&self.not_applicable)
        {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        columns
    }

    /// Reject configurations whose roles contradict each other
    pub fn validate(&self) -> Result<()> {
        let features = self.feature_columns();
        if features.is_empty() {
            return Err(PrepError::ConfigError("no feature columns declared".to_string()));
        }
        if self.target_column.is_empty() {
            return Err(PrepError::ConfigError("target column is empty".to_string()));
        }
        if features.contains(&self.target_column) {
            return Err(PrepError::ConfigError(format!(
                "target '{}' is also declared as a feature",
                self.target_column
            )));
        }
        if let Some(key) = &self.key_column {
            if features.contains(key) {
                return Err(PrepError::ConfigError(format!(
                    "key '{}' is also declared as a feature",
                    key
                )));
            }
        }

        for (i, c) in self.interactions.iter().enumerate() {
            if self.interactions[..i].contains(c) {
                return Err(PrepError::ConfigError(format!(
                    "interaction column '{}' is listed more than once",
                    c
                )));
            }
        }

        ensure_subset("impute_median", &self.impute_median, &[&self.numeric], "numeric")?;
        ensure_subset("interaction", &self.interactions, &[&self.numeric], "numeric")?;
        ensure_subset(
            "not_applicable",
            &self.not_applicable,
            &[&self.binary, &self.one_hot],
            "binary or one_hot",
        )?;

        for c in &self.binary {
            if self.one_hot.contains(c) || self.numeric.contains(c) {
                return Err(PrepError::ConfigError(format!(
                    "column '{}' has more than one encoding role",
                    c
                )));
            }
        }
        for c in &self.one_hot {
            if self.numeric.contains(c) {
                return Err(PrepError::ConfigError(format!(
                    "column '{}' has more than one encoding role",
                    c
                )));
            }
        }

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PrepError::InvalidInput(format!(
                "test_fraction = {} must lie in (0, 1)",
                self.test_fraction
            )));
        }
        if !(self.ridge_alpha >= 0.0) {
            return Err(PrepError::InvalidInput(format!(
                "ridge_alpha = {} must be non-negative",
                self.ridge_alpha
            )));
        }

        Ok(())
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
