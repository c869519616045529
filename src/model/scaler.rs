//! Per-feature standardization

use crate::error::{Result, ScoringError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard scaler: z = (x - mean) / std, fit per feature column.
///
/// Fit on the training split only; inference reuses the stored parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Option<Array1<f64>>,
    scales: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a fitted scaler from persisted parameters
    pub fn from_parameters(means: Array1<f64>, scales: Array1<f64>) -> Self {
        Self {
            means: Some(means),
            scales: Some(scales),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.means.is_some()
    }

    /// Per-feature means
    pub fn means(&self) -> Result<&Array1<f64>> {
        self.means.as_ref().ok_or(ScoringError::ModelNotFitted)
    }

    /// Per-feature scales (population standard deviations)
    pub fn scales(&self) -> Result<&Array1<f64>> {
        self.scales.as_ref().ok_or(ScoringError::ModelNotFitted)
    }

    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(ScoringError::DataError(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let means = x.mean_axis(Axis(0)).ok_or_else(|| {
            ScoringError::DataError("failed to compute column means".to_string())
        })?;
        let scales = x
            .std_axis(Axis(0), 0.0)
            // Constant columns get unit scale so standardization stays finite
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        self.means = Some(means);
        self.scales = Some(scales);
        Ok(self)
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let means = self.means()?;
        let scales = self.scales()?;
        self.check_width(x.ncols())?;

        let mut result = x.clone();
        for mut row in result.rows_mut() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (*value - means[j]) / scales[j];
            }
        }
        Ok(result)
    }

    /// Standardize a single feature row
    pub fn transform_row(&self, row: &Array1<f64>) -> Result<Array1<f64>> {
        let means = self.means()?;
        let scales = self.scales()?;
        self.check_width(row.len())?;

        Ok(Array1::from_iter(
            row.iter()
                .enumerate()
                .map(|(j, &v)| (v - means[j]) / scales[j]),
        ))
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    fn check_width(&self, ncols: usize) -> Result<()> {
        let expected = self.means()?.len();
        if ncols != expected {
            return Err(ScoringError::ShapeError {
                expected: format!("{} features", expected),
                actual: format!("{} features", ncols),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardized_columns() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();

        for j in 0..2 {
            let col = z.column(j);
            let mean: f64 = col.iter().sum::<f64>() / col.len() as f64;
            let var: f64 = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-10, "column {} mean = {}", j, mean);
            assert!((var - 1.0).abs() < 1e-10, "column {} var = {}", j, var);
        }
    }

    #[test]
    fn test_constant_column_unit_scale() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();

        // Constant column standardizes to zeros, not NaN
        for v in z.column(0).iter() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn test_transform_row_matches_matrix() {
        let x = array![[1.0, 4.0], [2.0, 5.0], [3.0, 9.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();

        let row = scaler.transform_row(&array![2.0, 5.0]).unwrap();
        assert!((row[0] - z[[1, 0]]).abs() < 1e-12);
        assert!((row[1] - z[[1, 1]]).abs() < 1e-12);
    }

    #[test]
    fn test_unfitted_transform_fails() {
        let scaler = StandardScaler::new();
        let x = array![[1.0, 2.0]];
        assert!(matches!(
            scaler.transform(&x),
            Err(ScoringError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).unwrap();

        let wrong = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            scaler.transform(&wrong),
            Err(ScoringError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_from_parameters() {
        let scaler = StandardScaler::from_parameters(array![1.0, 2.0], array![2.0, 4.0]);
        let row = scaler.transform_row(&array![3.0, 10.0]).unwrap();
        assert_eq!(row, array![1.0, 2.0]);
    }
}
