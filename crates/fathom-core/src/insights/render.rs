//! Insight rendering
//!
//! Rules produce structured [`Insight`]s; a renderer turns them into text.

use super::types::{AdviceTopic, Insight, InsightKind};

/// Converts insights into user-facing text
pub trait InsightRenderer {
    fn render(&self, insight: &Insight) -> String;

    fn render_all(&self, insights: &[Insight]) -> Vec<String> {
        insights.iter().map(|i| self.render(i)).collect()
    }
}

/// Plain English sentences with amounts in one currency
pub struct TextRenderer {
    currency_symbol: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new("€")
    }
}

impl TextRenderer {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

fn advice_text(topic: AdviceTopic) -> &'static str {
    match topic {
        AdviceTopic::LowSavings => {
            "Your savings rate is below the recommended level. Consider the 50/30/20 rule: \
             50% for needs, 30% for wants, and 20% for savings."
        }
        AdviceTopic::StrongSavings => {
            "You have an excellent savings rate! Consider putting some of your savings into \
             investments for better long-term growth."
        }
        AdviceTopic::EmergencyFund => {
            "Your emergency fund could use a boost. Aim for 3-6 months of expenses saved in an \
             accessible account."
        }
        AdviceTopic::Investing => {
            "Consider increasing your investments to build long-term wealth. Even small regular \
             contributions can grow significantly over time."
        }
        AdviceTopic::Goals => {
            "You're falling behind on your financial goals. Consider revisiting your timeline or \
             increasing your contributions."
        }
    }
}

impl InsightRenderer for TextRenderer {
    fn render(&self, insight: &Insight) -> String {
        match &insight.kind {
            InsightKind::FrequentSmallExpenses {
                count,
                average,
                total,
                top_category,
            } => format!(
                "You have {} frequent small expenses averaging {}, mostly on {}. These add up to {}.",
                count,
                self.money(*average),
                top_category,
                self.money(*total)
            ),
            InsightKind::LargeOccasionalExpenses {
                count,
                average,
                top_category,
                monthly_budget,
                ..
            } => format!(
                "You have {} large expenses on {} averaging {}. Consider budgeting {} monthly for these expenses.",
                count,
                top_category,
                self.money(*average),
                self.money(*monthly_budget)
            ),
            InsightKind::TopCategory {
                category,
                amount,
                share_percent,
            } => format!(
                "Your highest spending category is {} at {}. This represents {:.1}% of your expenses.",
                category,
                self.money(*amount),
                share_percent
            ),
            InsightKind::CategoryChange {
                category,
                change_percent,
                ..
            } if *change_percent >= 0.0 => format!(
                "Your spending on {} has increased by {:.1}% this month.",
                category, change_percent
            ),
            InsightKind::CategoryChange {
                category,
                change_percent,
                ..
            } => format!(
                "Great job! You've reduced your {} spending by {:.1}% this month.",
                category,
                change_percent.abs()
            ),
            InsightKind::HealthAdvice { topic } => advice_text(*topic).to_string(),
        }
    }
}
