//! Feature engineering module
//!
//! Provides pairwise interaction terms over numeric columns.

mod interactions;

pub use interactions::{FeatureCrossing, InteractionExpander};
