//! Analytics models
//!
//! Each model is an independent, synchronous computation over caller-owned
//! data. Trained artifacts are immutable once built.
//!
//! ## Models
//!
//! - **Expense Predictor** - bagged regression trees, next-period spend per category
//! - **Spending Clusterer** - scale, PCA and k-means segmentation of expense rows
//! - **Budget Optimizer** - weighted reduction plan for a savings target
//! - **Investment Simulator** - Monte Carlo projection under a risk profile
//! - **Health Scorer** - weighted composite of five sub-scores
//!
//! Supporting pieces: the shared feature builder, numeric stages
//! (`scaler`, `pca`, `kmeans`, `forest`), lexicon sentiment and the
//! subscription tier rule.

pub mod budget;
pub mod clusterer;
pub mod features;
pub mod forest;
pub mod health;
pub mod investment;
pub mod kmeans;
pub mod pca;
pub mod predictor;
pub mod scaler;
pub mod sentiment;
pub mod subscription;

pub use budget::{category_totals, BudgetOptimizer, BudgetOutcome, BudgetPlan};
pub use clusterer::{
    summarize, ClusterArtifacts, ClusterSummary, Clustering, LabeledTransaction, SpendingClusterer,
};
pub use features::{
    build_feature_matrix, validate_transactions, FeatureField, FeatureLayout, FeatureMatrix,
    FeatureSchema, FeatureVector,
};
pub use health::{HealthComponent, HealthMetrics, HealthScore, HealthScorer};
pub use investment::{InvestmentProjection, InvestmentSimulator, ProjectionPoint, RiskLevel};
pub use predictor::{next_month, ExpensePredictor, TrainedExpenseModel};
pub use sentiment::{analyze_sentiment, Sentiment, SentimentReport};
pub use subscription::{recommend_tier, SubscriptionSignals, Tier};
