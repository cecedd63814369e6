//! Logistic regression for binary churn classification

use crate::error::{ChurnError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Binary logistic regression fitted with full-batch gradient descent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Array1<f64>>,
    bias: Option<f64>,
    /// L2 penalty strength
    l2_penalty: f64,
    /// Iteration cap; high enough to converge on typical data sizes
    max_iter: usize,
    /// Stop once the gradient norm falls below this
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
            bias: None,
            l2_penalty: 0.01,
            max_iter: 500,
            tol: 1e-6,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    /// Builder method to set the L2 penalty
    pub fn with_l2_penalty(mut self, l2_penalty: f64) -> Self {
        self.l2_penalty = l2_penalty;
        self
    }

    /// Builder method to set the iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Builder method to set the learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Fit on a feature matrix and 0/1 label vector.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ChurnError::TrainingError(
                "cannot fit on an empty matrix".to_string(),
            ));
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = sigmoid(&linear);

            let errors = &predictions - y;
            let dw = x.t().dot(&errors) / n_samples as f64 + &weights * self.l2_penalty;
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - dw * self.learning_rate;
            bias -= db * self.learning_rate;
        }

        self.weights = Some(weights);
        self.bias = Some(bias);
        self.is_fitted = true;

        Ok(self)
    }

    /// Class-1 probability for each row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.weights.as_ref().ok_or(ChurnError::ModelNotFitted)?;
        let bias = self.bias.unwrap_or(0.0);

        if x.ncols() != weights.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("{} features", weights.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let linear = x.dot(weights) + bias;
        Ok(sigmoid(&linear))
    }

    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().map(|w| w.len())
    }
}

fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
    z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}
