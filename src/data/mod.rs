//! Table input, held-out splitting and conversion to numeric arrays

mod loader;
mod split;
mod matrix;

pub use loader::{load_table, missing_counts, validate_key};
pub use split::train_test_split;
pub use matrix::{target_vector, to_feature_matrix};
