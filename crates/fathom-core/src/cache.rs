//! Trained-model cache keyed by ledger content
//!
//! Training is the expensive step of a run. The cache keeps the fitted
//! predictor and cluster artifacts behind `Arc`s together with the
//! fingerprint of the ledger and the model settings they were trained with.
//! It retrains when either changes, or after an explicit
//! [`ModelCache::invalidate`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::analytics::{
    ClusterArtifacts, ExpensePredictor, SpendingClusterer, TrainedExpenseModel,
};
use crate::config::{ClusteringConfig, PredictorConfig};
use crate::error::Result;
use crate::models::Transaction;

/// SHA-256 over every transaction's fields plus the row count (hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerFingerprint(String);

impl LedgerFingerprint {
    pub fn of(transactions: &[Transaction]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((transactions.len() as u64).to_be_bytes());
        for t in transactions {
            hasher.update(t.date.to_string().as_bytes());
            hasher.update([0u8]);
            hasher.update(t.category.as_bytes());
            hasher.update([0u8]);
            hasher.update(t.amount.to_be_bytes());
            hasher.update(t.description.as_bytes());
            hasher.update([0u8]);
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LedgerFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared handles to the models trained for one ledger
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub fingerprint: LedgerFingerprint,
    pub predictor: Arc<TrainedExpenseModel>,
    /// Absent when the ledger had no expense rows
    pub clusters: Option<Arc<ClusterArtifacts>>,
}

#[derive(Debug)]
struct CacheEntry {
    models: TrainedModels,
    predictor: PredictorConfig,
    clustering: ClusteringConfig,
}

#[derive(Debug, Default)]
pub struct ModelCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models for `transactions`, training them if the cached ones were fit
    /// on different data or with different predictor/clusterer settings
    pub fn get_or_train(
        &mut self,
        transactions: &[Transaction],
        predictor: &ExpensePredictor,
        clusterer: &SpendingClusterer,
    ) -> Result<TrainedModels> {
        let fingerprint = LedgerFingerprint::of(transactions);

        if let Some(entry) = &self.entry {
            if entry.models.fingerprint == fingerprint
                && entry.predictor == *predictor.config()
                && entry.clustering == *clusterer.config()
            {
                self.hits += 1;
                debug!(fingerprint = %fingerprint, "Model cache hit");
                return Ok(entry.models.clone());
            }
        }

        self.misses += 1;
        debug!(fingerprint = %fingerprint, "Model cache miss, training");

        let models = TrainedModels {
            fingerprint,
            predictor: Arc::new(predictor.train(transactions)?),
            clusters: clusterer.fit(transactions)?.map(Arc::new),
        };
        self.entry = Some(CacheEntry {
            models: models.clone(),
            predictor: predictor.config().clone(),
            clustering: clusterer.config().clone(),
        });
        Ok(models)
    }

    /// Drop cached models so the next call retrains
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Model cache invalidated");
        }
    }

    pub fn fingerprint(&self) -> Option<&LedgerFingerprint> {
        self.entry.as_ref().map(|e| &e.models.fingerprint)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
