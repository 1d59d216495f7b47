//! Per-column standardization for feature matrices.

use crate::features::FEATURE_COUNT;

/// Column-wise z-score scaler, fit on the training split only.
///
/// Constant columns (std below 1e-10) keep a scale of 1.0 so transforming
/// never divides by zero.
#[derive(Debug, Clone)]
pub struct ColumnScaler {
    centers: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
}

impl ColumnScaler {
    /// Fit centers and scales from the given feature rows.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let mut centers = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];

        if rows.is_empty() {
            return Self { centers, scales };
        }

        let n = rows.len() as f64;
        for col in 0..FEATURE_COUNT {
            let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
            let variance = if rows.len() > 1 {
                rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / (n - 1.0)
            } else {
                0.0
            };
            let std = variance.sqrt();

            centers[col] = mean;
            scales[col] = if std < 1e-10 { 1.0 } else { std };
        }

        Self { centers, scales }
    }

    /// Transform a single feature vector with the fitted parameters.
    pub fn transform(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            out[col] = (row[col] - self.centers[col]) / self.scales[col];
        }
        out
    }

    /// Transform a batch of feature vectors.
    pub fn transform_all(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}
