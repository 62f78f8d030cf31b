//! Health Advice Rule
//!
//! Turns weak (or notably strong) health sub-scores into advice.

use crate::analytics::HealthComponent;
use crate::error::Result;

use super::engine::{InsightContext, InsightRule};
use super::types::{AdviceTopic, Insight, InsightKind, Severity};

const LOW_SAVINGS_BELOW: f64 = 50.0;
const STRONG_SAVINGS_ABOVE: f64 = 80.0;
const EMERGENCY_FUND_BELOW: f64 = 60.0;
const INVESTING_BELOW: f64 = 40.0;
const GOALS_BELOW: f64 = 50.0;

pub struct HealthAdviceRule;

fn advice(topic: AdviceTopic, severity: Severity) -> Insight {
    Insight::new(
        InsightKind::HealthAdvice { topic },
        severity,
        format!("health:{}", topic),
    )
}

impl InsightRule for HealthAdviceRule {
    fn id(&self) -> &'static str {
        "health_advice"
    }

    fn priority(&self) -> u8 {
        4
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
        let Some(health) = ctx.health else {
            return Ok(vec![]);
        };
        let mut insights = Vec::new();

        let savings = health.component(HealthComponent::SavingsRate);
        if savings < LOW_SAVINGS_BELOW {
            insights.push(advice(AdviceTopic::LowSavings, Severity::Warning));
        } else if savings > STRONG_SAVINGS_ABOVE {
            insights.push(advice(AdviceTopic::StrongSavings, Severity::Info));
        }
        if health.component(HealthComponent::EmergencyFund) < EMERGENCY_FUND_BELOW {
            insights.push(advice(AdviceTopic::EmergencyFund, Severity::Attention));
        }
        if health.component(HealthComponent::InvestmentStrategy) < INVESTING_BELOW {
            insights.push(advice(AdviceTopic::Investing, Severity::Attention));
        }
        if health.component(HealthComponent::GoalProgress) < GOALS_BELOW {
            insights.push(advice(AdviceTopic::Goals, Severity::Attention));
        }

        Ok(insights)
    }
}
