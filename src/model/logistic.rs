//! Binary logistic regression

use crate::error::{Result, ScoringError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logistic regression classifier fit by gradient descent with L2 weight decay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    /// L2 regularization strength
    alpha: f64,
    max_iter: usize,
    /// Gradient-norm convergence tolerance
    tol: f64,
    learning_rate: f64,
    is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Restore a fitted classifier from persisted parameters
    pub fn from_parameters(weights: Array1<f64>, bias: f64) -> Self {
        Self {
            weights: Some(weights),
            bias,
            is_fitted: true,
            ..Self::new()
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fitted weight vector
    pub fn weights(&self) -> Result<&Array1<f64>> {
        self.weights.as_ref().ok_or(ScoringError::ModelNotFitted)
    }

    /// Fitted intercept
    pub fn bias(&self) -> f64 {
        self.bias
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit on labels in {0, 1}
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ScoringError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ScoringError::TrainingError(
                "cannot fit on an empty training set".to_string(),
            ));
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;
        let mut iterations = self.max_iter;

        for iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + (self.alpha * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                iterations = iter;
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        debug!(iterations, "logistic regression fit complete");

        self.weights = Some(weights);
        self.bias = bias;
        self.is_fitted = true;
        Ok(self)
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights()?;
        let linear = x.dot(weights) + self.bias;
        Ok(Self::sigmoid(&linear))
    }

    /// Probability of the positive class for a single feature row
    pub fn predict_proba_row(&self, row: &Array1<f64>) -> Result<f64> {
        let weights = self.weights()?;
        if row.len() != weights.len() {
            return Err(ScoringError::ShapeError {
                expected: format!("{} features", weights.len()),
                actual: format!("{} features", row.len()),
            });
        }
        let z = row.dot(weights) + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    /// Hard class labels at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}
