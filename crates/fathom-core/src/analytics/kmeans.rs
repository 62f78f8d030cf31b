//! K-means partitioning
//!
//! k-means++ seeding followed by Lloyd iterations. Several seeded restarts
//! are run and the one with the lowest inertia (within-cluster sum of
//! squared distances) is kept.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ClusteringConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeans {
    centroids: Vec<Vec<f64>>,
    inertia: f64,
    iterations: usize,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(centroids: &[Vec<f64>], point: &[f64]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(c, point)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

impl KMeans {
    /// Partition `points` into `min(n_clusters, points.len())` groups
    pub fn fit(points: &[Vec<f64>], config: &ClusteringConfig) -> Self {
        let k = config.n_clusters.min(points.len());
        if k == 0 {
            return Self {
                centroids: Vec::new(),
                inertia: 0.0,
                iterations: 0,
            };
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut best: Option<KMeans> = None;
        for _ in 0..config.n_init.max(1) {
            let seeds = plus_plus_init(points, k, &mut rng);
            let run = lloyd(points, seeds, config.max_iter, config.tolerance);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        // n_init >= 1 guarantees a run
        best.unwrap_or_else(|| Self {
            centroids: Vec::new(),
            inertia: 0.0,
            iterations: 0,
        })
    }

    /// Index of the closest centroid
    pub fn predict(&self, point: &[f64]) -> usize {
        nearest(&self.centroids, point).0
    }

    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Pick the first centroid uniformly, then each next one with probability
/// proportional to its squared distance from the nearest chosen centroid.
fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = vec![points[rng.gen_range(0..points.len())].clone()];
    let mut dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = dist.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut idx = points.len() - 1;
            for (i, d) in dist.iter().enumerate() {
                if target < *d {
                    idx = i;
                    break;
                }
                target -= d;
            }
            idx
        } else {
            // Every point coincides with a centroid already
            rng.gen_range(0..points.len())
        };

        let centroid = points[chosen].clone();
        for (d, p) in dist.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, max_iter: usize, tol: f64) -> KMeans {
    let dims = points[0].len();
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;

    for _ in 0..max_iter.max(1) {
        iterations += 1;
        for (label, p) in labels.iter_mut().zip(points) {
            *label = nearest(&centroids, p).0;
        }

        let mut sums = vec![vec![0.0; dims]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (label, p) in labels.iter().zip(points) {
            counts[*label] += 1;
            for (s, v) in sums[*label].iter_mut().zip(p) {
                *s += v;
            }
        }

        let mut shift = 0.0;
        for (c, (sum, count)) in centroids.iter_mut().zip(sums.into_iter().zip(counts)) {
            // An emptied cluster keeps its previous centroid
            if count == 0 {
                continue;
            }
            let updated: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
            shift += squared_distance(c, &updated);
            *c = updated;
        }

        if shift <= tol {
            break;
        }
    }

    let inertia = points.iter().map(|p| nearest(&centroids, p).1).sum();
    KMeans {
        centroids,
        inertia,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        for (cx, cy) in [(0.0, 0.0), (10.0, 10.0), (-10.0, 10.0)] {
            for i in 0..10 {
                let jitter = (i as f64 - 4.5) * 0.05;
                points.push(vec![cx + jitter, cy - jitter]);
            }
        }
        points
    }

    #[test]
    fn test_separates_blobs() {
        let points = blobs();
        let model = KMeans::fit(&points, &ClusteringConfig::default());

        assert_eq!(model.centroids().len(), 3);
        for blob in points.chunks(10) {
            let label = model.predict(&blob[0]);
            assert!(blob.iter().all(|p| model.predict(p) == label));
        }
        assert!(model.inertia() < 2.0);
    }

    #[test]
    fn test_seeded_runs_match() {
        let points = blobs();
        let config = ClusteringConfig::default();
        assert_eq!(KMeans::fit(&points, &config), KMeans::fit(&points, &config));
    }

    #[test]
    fn test_fewer_points_than_clusters() {
        let points = vec![vec![1.0], vec![5.0]];
        let model = KMeans::fit(&points, &ClusteringConfig::default());
        assert_eq!(model.centroids().len(), 2);
        assert_ne!(model.predict(&[1.0]), model.predict(&[5.0]));
    }

    #[test]
    fn test_identical_points() {
        let points = vec![vec![2.0, 2.0]; 6];
        let model = KMeans::fit(&points, &ClusteringConfig::default());
        assert_eq!(model.inertia(), 0.0);
        assert!(model.predict(&[2.0, 2.0]) < 3);
    }

    #[test]
    fn test_no_points() {
        let model = KMeans::fit(&[], &ClusteringConfig::default());
        assert!(model.centroids().is_empty());
    }
}
