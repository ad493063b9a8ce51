//! Training module
//!
//! Holds the regularized linear model fit on preprocessed features.

mod linear_models;

pub use linear_models::RidgeRegression;
