//! Subscription tier recommendation
//!
//! Static scoring rule over four usage signals; no learning involved.
//! Each signal scores 0, 1 or 2 and the total picks the tier.

use serde::{Deserialize, Serialize};

use crate::models::FinanceSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Pro,
    Elite,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Pro => "Pro",
            Self::Elite => "Elite",
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "elite" => Ok(Self::Elite),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Usage signals the tier is scored from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSignals {
    pub income: f64,
    pub goal_count: usize,
    pub transaction_count: usize,
    /// Savings plus investments
    pub assets: f64,
}

impl SubscriptionSignals {
    pub fn from_session(session: &FinanceSession) -> Self {
        Self {
            income: crate::models::total_income(&session.transactions),
            goal_count: session.goals.len(),
            transaction_count: session.transactions.len(),
            assets: session.balances.savings + session.balances.investments,
        }
    }

    /// Sum of the four 0-2 signal scores
    pub fn score(&self) -> u8 {
        let income = match self.income {
            x if x < 2000.0 => 0,
            x if x < 4000.0 => 1,
            _ => 2,
        };
        let goals = match self.goal_count {
            0..=2 => 0,
            3..=5 => 1,
            _ => 2,
        };
        let volume = match self.transaction_count {
            0..=19 => 0,
            20..=49 => 1,
            _ => 2,
        };
        let assets = match self.assets {
            x if x < 1000.0 => 0,
            x if x < 5000.0 => 1,
            _ => 2,
        };
        income + goals + volume + assets
    }
}

pub fn recommend_tier(signals: &SubscriptionSignals) -> Tier {
    match signals.score() {
        0..=3 => Tier::Basic,
        4..=6 => Tier::Pro,
        _ => Tier::Elite,
    }
}
