//! Stratified train/test splitting

use crate::error::{Result, ScoringError};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// A single stratified train/test split
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

/// Split `(x, y)` into train/test partitions, stratified on the label so both
/// partitions preserve the overall class ratio.
///
/// `test_fraction` must lie in (0, 1). The shuffle is seeded, so the split is
/// reproducible.
pub fn stratified_train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if x.nrows() != y.len() {
        return Err(ScoringError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(ScoringError::InvalidParameter {
            name: "test_fraction".to_string(),
            value: test_fraction.to_string(),
            reason: "must be in (0, 1)".to_string(),
        });
    }

    // Group sample indices by class. BTreeMap keeps class iteration order
    // deterministic across runs.
    let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in y.iter().enumerate() {
        class_indices.entry(label.round() as i64).or_default().push(idx);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for indices in class_indices.values() {
        let mut shuffled = indices.clone();
        shuffled.shuffle(&mut rng);

        let n_test = ((shuffled.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(shuffled.len());
        test_indices.extend_from_slice(&shuffled[..n_test]);
        train_indices.extend_from_slice(&shuffled[n_test..]);
    }

    if train_indices.is_empty() || test_indices.is_empty() {
        return Err(ScoringError::DataError(
            "split produced an empty partition; not enough samples".to_string(),
        ));
    }

    Ok(TrainTestSplit {
        x_train: select_rows(x, &train_indices),
        y_train: select_labels(y, &train_indices),
        x_test: select_rows(x, &test_indices),
        y_test: select_labels(y, &test_indices),
    })
}

fn select_rows(x: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    let mut out = Array2::zeros((indices.len(), x.ncols()));
    for (row, &idx) in indices.iter().enumerate() {
        out.row_mut(row).assign(&x.row(idx));
    }
    out
}

fn select_labels(y: &Array1<f64>, indices: &[usize]) -> Array1<f64> {
    Array1::from_iter(indices.iter().map(|&idx| y[idx]))
}
