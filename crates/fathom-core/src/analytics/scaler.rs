//! Column standardizer
//!
//! Fits per-column mean and population standard deviation so that
//! transformed columns have mean 0 and variance 1. Constant columns keep a
//! scale of 1 and transform to zeros.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit on `rows`, each of length `n_features`
    pub fn fit(rows: &[Vec<f64>], n_features: usize) -> Self {
        let n = rows.len() as f64;
        let mut means = vec![0.0; n_features];
        let mut scales = vec![1.0; n_features];
        if rows.is_empty() {
            return Self { means, scales };
        }

        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        for (j, scale) in scales.iter_mut().enumerate() {
            let variance = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            *scale = if std > 1e-12 { std } else { 1.0 };
        }

        Self { means, scales }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
