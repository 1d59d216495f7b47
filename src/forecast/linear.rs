//! Linear regression over fixed-width feature vectors.
//!
//! Fits ordinary least squares via the normal equations, solved with a
//! Cholesky decomposition. One instance serves as the per-category demand
//! model; the feature width is fixed by the feature builder.

use crate::error::{ReplenishError, Result};
use crate::features::FEATURE_COUNT;

/// Fitted linear model: `y = intercept + coefficients . x`.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: [f64; FEATURE_COUNT],
}

impl LinearModel {
    /// Fit the model to feature rows and targets.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(ReplenishError::EmptyTable("training features"));
        }
        if targets.len() != n {
            return Err(ReplenishError::DimensionMismatch {
                expected: n,
                got: targets.len(),
            });
        }

        // Normal equations over [1, x1, .., xk]
        let p = FEATURE_COUNT + 1;
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];

        for (row, &y) in rows.iter().zip(targets.iter()) {
            xtx[0][0] += 1.0;
            for i in 0..FEATURE_COUNT {
                xtx[0][i + 1] += row[i];
                xtx[i + 1][0] += row[i];
                for j in 0..FEATURE_COUNT {
                    xtx[i + 1][j + 1] += row[i] * row[j];
                }
            }
            xty[0] += y;
            for i in 0..FEATURE_COUNT {
                xty[i + 1] += row[i] * y;
            }
        }

        // Small ridge term keeps the system positive definite when columns
        // are collinear (constant cyclical encodings, duplicated lags)
        for i in 0..p {
            xtx[i][i] += 1e-8;
        }

        let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
            ReplenishError::ComputationError(
                "normal equations not positive definite".to_string(),
            )
        })?;

        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients.copy_from_slice(&beta[1..]);

        Ok(Self {
            intercept: beta[0],
            coefficients,
        })
    }

    /// Predict a single value. The output is not clamped here; demand
    /// flooring happens at the forecasting layer.
    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
