//! Analytics Engine - one full run over a finance session
//!
//! Order of work:
//! 1. Validate the ledger
//! 2. Fetch or train the predictor and cluster artifacts (model cache)
//! 3. Predict next-month spend, label clusters, score health
//! 4. Optional budget plan and investment projection
//! 5. Generate and render insights

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::{
    next_month, recommend_tier, summarize, validate_transactions, BudgetOptimizer, BudgetOutcome,
    ClusterSummary, ExpensePredictor, HealthScore, HealthScorer, InvestmentProjection,
    InvestmentSimulator, LabeledTransaction, RiskLevel, SpendingClusterer, SubscriptionSignals,
    Tier,
};
use crate::cache::{LedgerFingerprint, ModelCache, TrainedModels};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::insights::{Insight, InsightContext, InsightEngine, InsightRenderer, TextRenderer};
use crate::models::FinanceSession;

/// Parameters of a Monte Carlo projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRequest {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

/// What to compute beyond the always-on models
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Reference date for "this month"; defaults to the latest ledger date
    pub as_of: Option<NaiveDate>,
    /// Savings target for the budget plan (no plan when absent)
    pub target_savings: Option<f64>,
    pub investment: Option<InvestmentRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub as_of: NaiveDate,
    pub fingerprint: LedgerFingerprint,
    pub predicted_month: u32,
    pub predictions: BTreeMap<String, f64>,
    pub clusters: Vec<LabeledTransaction>,
    pub cluster_summaries: Vec<ClusterSummary>,
    pub budget: Option<BudgetOutcome>,
    pub health: HealthScore,
    pub investment: Option<InvestmentProjection>,
    pub tier: Tier,
    pub insights: Vec<Insight>,
    /// Insights rendered with the configured currency symbol
    pub insight_text: Vec<String>,
}

pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    cache: ModelCache,
    insights: InsightEngine,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            cache: ModelCache::new(),
            insights: InsightEngine::new(),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Drop cached models
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Trained models for the session's ledger (cached by fingerprint)
    pub fn models(&mut self, session: &FinanceSession) -> Result<TrainedModels> {
        self.cache.get_or_train(
            &session.transactions,
            &ExpensePredictor::new(self.config.predictor.clone()),
            &SpendingClusterer::new(self.config.clustering.clone()),
        )
    }

    pub fn analyze(
        &mut self,
        session: &FinanceSession,
        request: &AnalysisRequest,
    ) -> Result<AnalyticsReport> {
        let transactions = &session.transactions;
        validate_transactions(transactions)?;

        let as_of = request.as_of.unwrap_or_else(|| latest_date(session));
        let models = self.models(session)?;

        let predicted_month = next_month(as_of);
        let predictions = models
            .predictor
            .predict_next_period(transactions, predicted_month)?;

        let clusters = match &models.clusters {
            Some(artifacts) => artifacts.assign(transactions)?,
            None => Vec::new(),
        };
        let cluster_summaries = summarize(&clusters);

        let scorer = HealthScorer::new(self.config.health.clone());
        let health = scorer.score(transactions, &session.goals, &session.balances)?;

        let optimizer = BudgetOptimizer::new(self.config.budget.clone());
        let budget = request
            .target_savings
            .map(|target| optimizer.optimize(transactions, target))
            .transpose()?;

        let investment = request
            .investment
            .map(|inv| {
                InvestmentSimulator::new(self.config.investment.clone()).simulate(
                    inv.principal,
                    inv.monthly_contribution,
                    inv.years,
                    inv.risk_level,
                )
            })
            .transpose()?;

        let ctx = InsightContext {
            transactions,
            clusters: &clusters,
            health: Some(&health),
            as_of,
            window_months: scorer.window_months(transactions),
            config: &self.config.insights,
        };
        let insights = self.insights.generate(&ctx);
        let insight_text =
            TextRenderer::new(self.config.insights.currency_symbol.clone()).render_all(&insights);

        let tier = recommend_tier(&SubscriptionSignals::from_session(session));

        info!(
            rows = transactions.len(),
            clusters = cluster_summaries.len(),
            health = health.overall,
            insights = insights.len(),
            "Analytics run complete"
        );

        Ok(AnalyticsReport {
            as_of,
            fingerprint: models.fingerprint,
            predicted_month,
            predictions,
            clusters,
            cluster_summaries,
            budget,
            health,
            investment,
            tier,
            insights,
            insight_text,
        })
    }
}

/// Latest ledger date, or today for an empty ledger
fn latest_date(session: &FinanceSession) -> NaiveDate {
    session
        .transactions
        .iter()
        .map(|t| t.date)
        .max()
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}
