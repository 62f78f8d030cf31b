//! Analytics tuning configuration
//!
//! Every constant the pipeline treats as tunable (tree count, seeds, cluster
//! count, essentiality weights, risk table, insight cap, ...) lives here.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the config dir (~/.config/fathom/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Sections and keys missing from a file keep their default values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analytics::investment::RiskLevel;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Top-level analytics configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub predictor: PredictorConfig,
    pub clustering: ClusteringConfig,
    pub budget: BudgetConfig,
    pub investment: InvestmentConfig,
    pub health: HealthConfig,
    pub insights: InsightConfig,
}

/// Expense predictor (bagged regression trees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Seed for bootstrap sampling
    pub seed: u64,
    /// Maximum tree depth (unbounded when absent)
    pub max_depth: Option<usize>,
    /// Minimum rows a node needs before it may split
    pub min_samples_split: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Spending clusterer (scale -> PCA -> k-means)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub n_clusters: usize,
    /// Upper bound on PCA components
    pub max_components: usize,
    pub seed: u64,
    /// Independent k-means++ restarts; the lowest inertia wins
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on total centroid movement
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            max_components: 5,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

/// Budget optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Essentiality weight per category, in [0, 1]; lower = more protected
    pub weights: BTreeMap<String, f64>,
    /// Weight for categories missing from `weights`
    pub default_weight: f64,
    /// Largest fraction of a category's spend that may be cut at weight 1.0
    pub max_cut_fraction: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let weights = [
            ("Groceries", 0.3),
            ("Utilities", 0.3),
            ("Transport", 0.5),
            ("Dining", 0.8),
            ("Entertainment", 1.0),
            ("Shopping", 0.9),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            weights,
            default_weight: 0.7,
            max_cut_fraction: 0.3,
        }
    }
}

/// Expected annual return and volatility for one risk level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub annual_return: f64,
    pub annual_volatility: f64,
}

/// Risk table keyed by level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskProfiles {
    pub low: RiskProfile,
    pub medium: RiskProfile,
    pub high: RiskProfile,
}

impl RiskProfiles {
    pub fn for_level(&self, level: RiskLevel) -> RiskProfile {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}

impl Default for RiskProfiles {
    fn default() -> Self {
        Self {
            low: RiskProfile {
                annual_return: 0.05,
                annual_volatility: 0.05,
            },
            medium: RiskProfile {
                annual_return: 0.08,
                annual_volatility: 0.12,
            },
            high: RiskProfile {
                annual_return: 0.11,
                annual_volatility: 0.20,
            },
        }
    }
}

/// Investment simulator (Monte Carlo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentConfig {
    pub n_paths: usize,
    pub seed: u64,
    /// Percentile ranks reported for terminal values
    pub percentiles: Vec<u8>,
    pub risk_profiles: RiskProfiles,
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        Self {
            n_paths: 100,
            seed: 42,
            percentiles: vec![10, 50, 90],
            risk_profiles: RiskProfiles::default(),
        }
    }
}

/// Weights of the five health sub-scores (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub savings_rate: f64,
    pub emergency_fund: f64,
    pub goal_progress: f64,
    pub investment_strategy: f64,
    pub debt_management: f64,
}

impl HealthWeights {
    pub fn sum(&self) -> f64 {
        self.savings_rate
            + self.emergency_fund
            + self.goal_progress
            + self.investment_strategy
            + self.debt_management
    }
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            savings_rate: 0.25,
            emergency_fund: 0.25,
            goal_progress: 0.20,
            investment_strategy: 0.15,
            debt_management: 0.15,
        }
    }
}

/// Health scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Fixed number of months the ledger covers. When absent, the number of
    /// calendar months spanned by the expense rows is used.
    pub window_months: Option<u32>,
    /// Debt management sub-score (no debt signal is available)
    pub debt_placeholder: f64,
    pub weights: HealthWeights,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            window_months: None,
            debt_placeholder: 90.0,
            weights: HealthWeights::default(),
        }
    }
}

/// Insight generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Maximum number of insights returned
    pub max_insights: usize,
    /// Symbol used by the text renderer
    pub currency_symbol: String,
    /// A cluster with more rows than this (and a small mean) is "frequent"
    pub frequent_min_count: usize,
    pub frequent_max_mean: f64,
    /// A cluster with fewer rows than this (and a large mean) is "occasional"
    pub occasional_max_count: usize,
    pub occasional_min_mean: f64,
    /// Month-over-month change (percent) that triggers a category insight
    pub change_threshold_percent: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_insights: 5,
            currency_symbol: "€".to_string(),
            frequent_min_count: 10,
            frequent_max_mean: 20.0,
            occasional_max_count: 5,
            occasional_min_mean: 100.0,
            change_threshold_percent: 20.0,
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration (override first, then embedded default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            }
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => read_config(&default_path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse and validate config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: AnalyticsConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.predictor.n_trees == 0 {
            return Err(Error::Config("predictor.n_trees must be at least 1".into()));
        }
        if self.clustering.n_clusters == 0 || self.clustering.max_components == 0 {
            return Err(Error::Config(
                "clustering.n_clusters and clustering.max_components must be at least 1".into(),
            ));
        }
        if self.clustering.n_init == 0 {
            return Err(Error::Config("clustering.n_init must be at least 1".into()));
        }
        if self.investment.n_paths == 0 {
            return Err(Error::Config("investment.n_paths must be at least 1".into()));
        }
        if let Some(p) = self.investment.percentiles.iter().find(|p| **p > 100) {
            return Err(Error::Config(format!(
                "investment.percentiles out of range: {}",
                p
            )));
        }
        let weights = self
            .budget
            .weights
            .values()
            .chain(std::iter::once(&self.budget.default_weight));
        for w in weights {
            if !(0.0..=1.0).contains(w) {
                return Err(Error::Config(format!(
                    "budget weights must be within [0, 1], got {}",
                    w
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.budget.max_cut_fraction) {
            return Err(Error::Config(
                "budget.max_cut_fraction must be within [0, 1]".into(),
            ));
        }
        if (self.health.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(Error::Config(format!(
                "health.weights must sum to 1.0, got {:.4}",
                self.health.weights.sum()
            )));
        }
        if self.health.window_months == Some(0) {
            return Err(Error::Config("health.window_months must be positive".into()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fathom").join("analytics.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}
