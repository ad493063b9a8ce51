//! Ridge regression, the downstream consumer of preprocessed features

use crate::error::{PrepError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Returns `None` if the matrix is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Solve Ax = b by Gauss-Jordan elimination with partial pivoting (fallback)
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // Augmented matrix [A | b]
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-12 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Ridge Regression (L2-regularized linear regression with intercept)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    pub fit_intercept: bool,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(PrepError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PrepError::InvalidInput("cannot fit on zero rows".to_string()));
        }

        // Center data if fitting intercept
        let (x_c, y_c, x_mean, y_mean) = if self.fit_intercept {
            let xm = x
                .mean_axis(Axis(0))
                .ok_or_else(|| PrepError::ComputationError("empty feature matrix".to_string()))?;
            let ym = y.mean().unwrap_or(0.0);
            (x - &xm.clone().insert_axis(Axis(0)), y - ym, xm, ym)
        } else {
            (x.clone(), y.clone(), Array1::zeros(n_features), 0.0)
        };

        // (X^T X + alpha*I) w = X^T y
        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_c.t().dot(&y_c);

        let coefficients = cholesky_solve(&xtx, &xty)
            .or_else(|| gauss_jordan_solve(&xtx, &xty))
            .ok_or_else(|| PrepError::ComputationError("Singular matrix".to_string()))?;

        self.intercept = Some(y_mean - coefficients.dot(&x_mean));
        self.coefficients = Some(coefficients);
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(PrepError::NotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }

    /// Get R² score
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let p = self.predict(x)?;
        let ym = y.mean().unwrap_or(0.0);
        let ss_res = (&p - y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - ym).powi(2)).sum();
        Ok(if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ridge_regression() {
        // y = 2*x1 + 3*x2 + 1
        let x = array![
            [1.0, 1.0],
            [2.0, 1.0],
            [1.0, 2.0],
            [2.0, 2.0],
            [3.0, 1.0],
        ];
        let y = array![6.0, 8.0, 9.0, 11.0, 10.0];

        let mut model = RidgeRegression::new(1e-6);
        model.fit(&x, &y).unwrap();

        assert!(model.is_fitted());
        let r2 = model.score(&x, &y).unwrap();
        assert!(r2 > 0.99, "R² should be close to 1, got {}", r2);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_ridge_collinear_features() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let mut model = RidgeRegression::new(0.1);
        model.fit(&x, &y).unwrap();
        let r2 = model.score(&x, &y).unwrap();
        assert!(r2 > 0.95, "Ridge R² = {}", r2);
    }

    #[test]
    fn test_gauss_jordan_fallback() {
        let a = array![[0.0, 1.0], [1.0, 0.0]];
        let b = array![2.0, 3.0];
        assert!(cholesky_solve(&a, &b).is_none());
        let x = gauss_jordan_solve(&a, &b).unwrap();
        assert_eq!(x, array![3.0, 2.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        let mut model = RidgeRegression::default();
        assert!(matches!(model.fit(&x, &y), Err(PrepError::ShapeError { .. })));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = RidgeRegression::default();
        assert!(matches!(model.predict(&array![[1.0]]), Err(PrepError::NotFitted)));
    }
}
