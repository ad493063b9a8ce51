//! Held-out splitting

use crate::error::{PrepError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

fn take_rows(df: &DataFrame, mut indices: Vec<usize>) -> Result<DataFrame> {
    // Keep the original relative row order inside each split
    indices.sort_unstable();
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.into_iter().map(|i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

/// Shuffle rows and split off `test_fraction` of them as held-out data.
///
/// Both parts always receive at least one row. With the same `random_state`
/// the split is reproducible.
pub fn train_test_split(
    df: &DataFrame,
    test_fraction: f64,
    random_state: Option<u64>,
) -> Result<(DataFrame, DataFrame)> {
    let n_samples = df.height();
    if n_samples < 2 {
        return Err(PrepError::InvalidInput(format!(
            "n_samples ({}) must be >= 2 to split",
            n_samples
        )));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PrepError::InvalidInput(format!(
            "test_fraction = {} must lie in (0, 1)",
            test_fraction
        )));
    }

    let n_test = ((n_samples as f64) * test_fraction).round() as usize;
    let n_test = n_test.clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = match random_state {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    indices.shuffle(&mut rng);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();
    debug!(train = train_indices.len(), test = test_indices.len(), "table split");

    Ok((take_rows(df, train_indices)?, take_rows(df, test_indices)?))
}
