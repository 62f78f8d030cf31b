//! Principal component projection
//!
//! Components are the top eigenvectors of the sample covariance matrix.
//! Each component's sign is fixed so its largest-magnitude loading is
//! positive, which makes the projection reproducible across fits.

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pca {
    mean: Vec<f64>,
    /// Row-major: one row of loadings per component
    components: Vec<Vec<f64>>,
    explained_variance: Vec<f64>,
}

impl Pca {
    /// Fit `n_components` components (clamped to the feature and row counts)
    pub fn fit(rows: &[Vec<f64>], n_features: usize, n_components: usize) -> Self {
        let n = rows.len();
        let k = n_components.min(n_features).min(n.max(1));

        let mut mean = vec![0.0; n_features];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        if n > 0 {
            mean.iter_mut().for_each(|m| *m /= n as f64);
        }

        let centered = DMatrix::from_fn(n, n_features, |i, j| rows[i][j] - mean[j]);
        let denom = n.saturating_sub(1).max(1) as f64;
        let covariance = (centered.transpose() * &centered) / denom;
        let eigen = SymmetricEigen::new(covariance);

        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let mut components = Vec::with_capacity(k);
        let mut explained_variance = Vec::with_capacity(k);
        for &idx in order.iter().take(k) {
            let mut loadings: Vec<f64> = eigen.eigenvectors.column(idx).iter().copied().collect();
            let pivot = loadings
                .iter()
                .copied()
                .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                .unwrap_or(0.0);
            if pivot < 0.0 {
                loadings.iter_mut().for_each(|v| *v = -*v);
            }
            components.push(loadings);
            explained_variance.push(eigen.eigenvalues[idx].max(0.0));
        }

        Self {
            mean,
            components,
            explained_variance,
        }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| {
                c.iter()
                    .zip(row.iter().zip(&self.mean))
                    .map(|(w, (v, m))| w * (v - m))
                    .sum()
            })
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Variance captured by each component, largest first
    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_component_follows_main_axis() {
        // Points spread along y = 2x with small noise on a third axis
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| {
                let t = i as f64;
                vec![t, 2.0 * t, if i % 2 == 0 { 0.1 } else { -0.1 }]
            })
            .collect();
        let pca = Pca::fit(&rows, 3, 2);

        assert_eq!(pca.n_components(), 2);
        let first = &pca.components[0];
        let norm = (1.0f64 + 4.0).sqrt();
        assert!((first[0] - 1.0 / norm).abs() < 1e-3);
        assert!((first[1] - 2.0 / norm).abs() < 1e-3);
        assert!(pca.explained_variance()[0] > pca.explained_variance()[1]);
    }

    #[test]
    fn test_components_clamped() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![2.0, 1.0, 0.0]];
        let pca = Pca::fit(&rows, 3, 5);
        assert_eq!(pca.n_components(), 2);
        assert_eq!(pca.transform_row(&[1.0, 2.0, 3.0]).len(), 2);
    }

    #[test]
    fn test_projection_centers_data() {
        let rows = vec![vec![1.0, 1.0], vec![3.0, 3.0]];
        let pca = Pca::fit(&rows, 2, 1);
        let projected = pca.transform(&rows);
        assert!((projected[0][0] + projected[1][0]).abs() < 1e-12);
    }
}
