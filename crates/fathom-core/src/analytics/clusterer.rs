//! Spending Clusterer
//!
//! Segments expense rows into behavioral groups:
//! standardize -> project onto principal components -> k-means.
//!
//! The fitted stages are kept together as [`ClusterArtifacts`] so new rows
//! can be labeled in the same label space without refitting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClusteringConfig;
use crate::error::Result;
use crate::models::Transaction;

use super::features::{build_feature_matrix, expense_rows, FeatureLayout, FeatureSchema};
use super::kmeans::KMeans;
use super::pca::Pca;
use super::scaler::StandardScaler;

/// An expense row with its cluster label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub cluster: usize,
}

/// Fitted scaler, projection and partition. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterArtifacts {
    schema: FeatureSchema,
    scaler: StandardScaler,
    pca: Pca,
    kmeans: KMeans,
}

impl ClusterArtifacts {
    /// Label the expense rows of `transactions` with the fitted stages
    pub fn assign(&self, transactions: &[Transaction]) -> Result<Vec<LabeledTransaction>> {
        let (_, expenses) = expense_rows(transactions)?;
        Ok(expenses
            .into_iter()
            .map(|t| {
                let raw = self.schema.encode(t);
                let scaled = self.scaler.transform_row(raw.as_slice());
                let projected = self.pca.transform_row(&scaled);
                LabeledTransaction {
                    transaction: t.clone(),
                    cluster: self.kmeans.predict(&projected),
                }
            })
            .collect())
    }

    pub fn n_clusters(&self) -> usize {
        self.kmeans.centroids().len()
    }

    pub fn n_components(&self) -> usize {
        self.pca.n_components()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.schema.names()
    }

    pub fn inertia(&self) -> f64 {
        self.kmeans.inertia()
    }
}

/// Result of a clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clustering {
    pub labeled: Vec<LabeledTransaction>,
    /// Absent when the ledger has no expense rows
    pub artifacts: Option<ClusterArtifacts>,
}

/// Fits [`ClusterArtifacts`]
pub struct SpendingClusterer {
    config: ClusteringConfig,
}

impl Default for SpendingClusterer {
    fn default() -> Self {
        Self::new(ClusteringConfig::default())
    }
}

impl SpendingClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Fit the artifacts on the expense rows. `None` when there are none.
    pub fn fit(&self, transactions: &[Transaction]) -> Result<Option<ClusterArtifacts>> {
        let matrix = build_feature_matrix(transactions, FeatureLayout::Clustering)?;
        if matrix.rows.is_empty() {
            debug!("No expense rows to cluster");
            return Ok(None);
        }

        let rows = matrix.to_rows();
        let n_features = matrix.schema.len();
        let scaler = StandardScaler::fit(&rows, n_features);
        let scaled = scaler.transform(&rows);
        let pca = Pca::fit(&scaled, n_features, self.config.max_components);
        let projected = pca.transform(&scaled);
        let kmeans = KMeans::fit(&projected, &self.config);

        debug!(
            rows = rows.len(),
            features = n_features,
            components = pca.n_components(),
            clusters = kmeans.centroids().len(),
            inertia = kmeans.inertia(),
            iterations = kmeans.iterations(),
            "Fitted spending clusters"
        );

        Ok(Some(ClusterArtifacts {
            schema: matrix.schema,
            scaler,
            pca,
            kmeans,
        }))
    }

    /// Fit and label in one step
    pub fn cluster(&self, transactions: &[Transaction]) -> Result<Clustering> {
        let artifacts = self.fit(transactions)?;
        let labeled = match &artifacts {
            Some(a) => a.assign(transactions)?,
            None => Vec::new(),
        };
        Ok(Clustering { labeled, artifacts })
    }
}

/// Per-cluster aggregates used by the insight rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    /// Most frequent category (alphabetically first on ties)
    pub top_category: String,
    pub mean_day_of_week: f64,
}

/// Aggregate labeled rows by cluster, ordered by label
pub fn summarize(labeled: &[LabeledTransaction]) -> Vec<ClusterSummary> {
    let mut groups: BTreeMap<usize, Vec<&Transaction>> = BTreeMap::new();
    for row in labeled {
        groups.entry(row.cluster).or_default().push(&row.transaction);
    }

    groups
        .into_iter()
        .map(|(cluster, rows)| {
            let count = rows.len();
            let total: f64 = rows.iter().map(|t| t.amount.abs()).sum();
            let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
            for t in &rows {
                *frequency.entry(t.category.as_str()).or_default() += 1;
            }
            let top_category = frequency
                .into_iter()
                .fold(("", 0), |best, cur| if cur.1 > best.1 { cur } else { best })
                .0
                .to_string();
            let mean_day_of_week =
                rows.iter().map(|t| t.day_of_week() as f64).sum::<f64>() / count as f64;

            ClusterSummary {
                cluster,
                count,
                total,
                mean: total / count as f64,
                top_category,
                mean_day_of_week,
            }
        })
        .collect()
}
