//! Fathom Core Library
//!
//! Personal-finance analytics over an in-memory ledger:
//! - Feature builder shared by the trained models
//! - Expense predictor (bagged regression trees)
//! - Spending clusterer (standardize, PCA, k-means)
//! - Budget optimizer for a savings target
//! - Monte Carlo investment simulator
//! - Financial health scorer
//! - Rule-based insight generator with swappable rendering
//! - Analytics engine with a content-keyed model cache
//! - Ledger CSV and goal JSON import

pub mod analytics;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;

/// Deterministic fixtures shared by unit tests
#[cfg(test)]
pub mod test_utils;

pub use analytics::{
    analyze_sentiment, recommend_tier, BudgetOptimizer, BudgetOutcome, BudgetPlan,
    ClusterArtifacts, Clustering, ExpensePredictor, HealthComponent, HealthScore, HealthScorer,
    InvestmentProjection, InvestmentSimulator, LabeledTransaction, RiskLevel, Sentiment,
    SentimentReport, SpendingClusterer, SubscriptionSignals, Tier, TrainedExpenseModel,
};
pub use cache::{LedgerFingerprint, ModelCache, TrainedModels};
pub use config::AnalyticsConfig;
pub use engine::{AnalysisRequest, AnalyticsEngine, AnalyticsReport, InvestmentRequest};
pub use error::{Error, Result};
pub use import::{parse_goals_json, parse_ledger_csv};
pub use insights::{Insight, InsightEngine, InsightKind, InsightRenderer, TextRenderer};
pub use models::{Balances, FinanceSession, Goal, Transaction, TransactionType};
