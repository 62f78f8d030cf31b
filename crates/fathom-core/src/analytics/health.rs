//! Health Scorer
//!
//! Weighted composite of five sub-scores, each clamped to [0, 100]:
//!
//! | Component           | Raw metric                                | Scale  |
//! |---------------------|-------------------------------------------|--------|
//! | Savings Rate        | (income - expenses) / income, %           | x 2    |
//! | Emergency Fund      | savings / monthly expenses, months        | x 33.3 |
//! | Goal Progress       | mean current / target, %                  | x 1.5  |
//! | Investment Strategy | investments / all balances, %             | x 2    |
//! | Debt Management     | fixed placeholder (no debt data)          |        |

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HealthConfig;
use crate::error::{Error, Result};
use crate::models::{total_expenses, total_income, Balances, Goal, Transaction};

use super::features::validate_transactions;

const SAVINGS_RATE_SCALE: f64 = 2.0;
const EMERGENCY_FUND_SCALE: f64 = 33.3;
const GOAL_PROGRESS_SCALE: f64 = 1.5;
const INVESTMENT_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthComponent {
    SavingsRate,
    EmergencyFund,
    GoalProgress,
    InvestmentStrategy,
    DebtManagement,
}

impl HealthComponent {
    pub const ALL: [HealthComponent; 5] = [
        Self::SavingsRate,
        Self::EmergencyFund,
        Self::GoalProgress,
        Self::InvestmentStrategy,
        Self::DebtManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SavingsRate => "Savings Rate",
            Self::EmergencyFund => "Emergency Fund",
            Self::GoalProgress => "Goal Progress",
            Self::InvestmentStrategy => "Investment Strategy",
            Self::DebtManagement => "Debt Management",
        }
    }
}

impl std::fmt::Display for HealthComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw inputs behind the sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub savings_rate: f64,
    pub emergency_fund_months: f64,
    pub goal_progress: f64,
    pub investment_ratio: f64,
    /// Months the expense total is spread over
    pub window_months: u32,
    pub monthly_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Weighted composite, 0-100
    pub overall: u8,
    pub components: BTreeMap<HealthComponent, f64>,
    pub metrics: HealthMetrics,
}

impl HealthScore {
    pub fn component(&self, component: HealthComponent) -> f64 {
        self.components.get(&component).copied().unwrap_or(0.0)
    }
}

pub struct HealthScorer {
    config: HealthConfig,
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}

impl HealthScorer {
    pub fn new(config: HealthConfig) -> Self {
        Self { config }
    }

    /// Months covered by the ledger: the configured window, or the calendar
    /// months spanned by the expense rows (at least 1)
    pub fn window_months(&self, transactions: &[Transaction]) -> u32 {
        match self.config.window_months {
            Some(n) => n.max(1),
            None => observed_months(transactions),
        }
    }

    pub fn score(
        &self,
        transactions: &[Transaction],
        goals: &[Goal],
        balances: &Balances,
    ) -> Result<HealthScore> {
        validate_transactions(transactions)?;
        validate_inputs(goals, balances)?;

        let income = total_income(transactions);
        let expenses = total_expenses(transactions);
        let window_months = self.window_months(transactions);
        let monthly_expenses = expenses / window_months as f64;

        let savings_rate = if income > 0.0 {
            (income - expenses) / income * 100.0
        } else {
            0.0
        };
        let emergency_fund_months = if monthly_expenses > 0.0 {
            balances.savings / monthly_expenses
        } else {
            0.0
        };
        let goal_progress = if goals.is_empty() {
            0.0
        } else {
            goals.iter().map(Goal::progress_percent).sum::<f64>() / goals.len() as f64
        };
        let total_balance = balances.total();
        let investment_ratio = if total_balance > 0.0 {
            balances.investments / total_balance * 100.0
        } else {
            0.0
        };

        let weights = &self.config.weights;
        let scored = [
            (
                HealthComponent::SavingsRate,
                savings_rate * SAVINGS_RATE_SCALE,
                weights.savings_rate,
            ),
            (
                HealthComponent::EmergencyFund,
                emergency_fund_months * EMERGENCY_FUND_SCALE,
                weights.emergency_fund,
            ),
            (
                HealthComponent::GoalProgress,
                goal_progress * GOAL_PROGRESS_SCALE,
                weights.goal_progress,
            ),
            (
                HealthComponent::InvestmentStrategy,
                investment_ratio * INVESTMENT_SCALE,
                weights.investment_strategy,
            ),
            (
                HealthComponent::DebtManagement,
                self.config.debt_placeholder,
                weights.debt_management,
            ),
        ];

        let mut components = BTreeMap::new();
        let mut weighted = 0.0;
        for (component, raw, weight) in scored {
            let sub = raw.clamp(0.0, 100.0);
            weighted += sub * weight;
            components.insert(component, sub);
        }
        let overall = weighted.round().clamp(0.0, 100.0) as u8;

        debug!(overall, window_months, "Scored financial health");

        Ok(HealthScore {
            overall,
            components,
            metrics: HealthMetrics {
                savings_rate,
                emergency_fund_months,
                goal_progress,
                investment_ratio,
                window_months,
                monthly_expenses,
            },
        })
    }
}

/// Goal amounts and balances must be finite
fn validate_inputs(goals: &[Goal], balances: &Balances) -> Result<()> {
    if let Some(goal) = goals
        .iter()
        .find(|g| !g.current.is_finite() || !g.target.is_finite())
    {
        return Err(Error::Validation(format!(
            "goal '{}': current and target must be finite",
            goal.name
        )));
    }
    if ![balances.cash, balances.savings, balances.investments]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(Error::Validation("balances must be finite".into()));
    }
    Ok(())
}

/// Calendar months between the first and last expense row, inclusive
pub fn observed_months(transactions: &[Transaction]) -> u32 {
    let months = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.date.year() as i64 * 12 + t.date.month0() as i64);
    let (min, max) = months.fold((i64::MAX, i64::MIN), |(lo, hi), m| (lo.min(m), hi.max(m)));
    if min > max {
        return 1;
    }
    (max - min + 1) as u32
}
