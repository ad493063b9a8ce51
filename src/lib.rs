//! Kolosal Prep - fit/transform preprocessing for tabular regression data
//!
//! Turns a raw table of mixed numeric and categorical fields, some with
//! absent values, into a fully numeric feature table a regularized linear
//! model can consume. Every transformer learns its statistics from training
//! rows only and reapplies them, unchanged, to held-out rows.
//!
//! # Modules
//!
//! - [`data`] - CSV loading, key validation, held-out split, array conversion
//! - [`preprocessing`] - selection, imputation, encoding, scaling and the pipeline
//! - [`feature_engineering`] - pairwise interaction terms
//! - [`training`] - ridge regression over preprocessed features
//! - [`walkthrough`] - end-to-end driver tying the pieces together
//! - [`cli`] - command-line interface

// Core error handling
pub mod error;

// Data handling
pub mod data;

// Preprocessing
pub mod preprocessing;
pub mod feature_engineering;

// Downstream model
pub mod training;

// Driver and services
pub mod walkthrough;
pub mod cli;

pub use error::{PrepError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::data::{
        load_table, missing_counts, target_vector, to_feature_matrix, train_test_split,
        validate_key,
    };
    pub use crate::error::{PrepError, Result};
    pub use crate::feature_engineering::{FeatureCrossing, InteractionExpander};
    pub use crate::preprocessing::{
        BinaryEncoder, ColumnSelector, ImputeStrategy, MissingValueHandler, OneHotEncoder,
        PipelineConfig, PipelineStep, PreprocessingPipeline, Standardizer, TableTransformer,
    };
    pub use crate::training::RidgeRegression;
    pub use crate::walkthrough::{Walkthrough, WalkthroughOutput, WalkthroughReport};
}
