//! Top Category Rule
//!
//! Names the highest-spend category and its share of all expenses.
//! Emitted whenever any expense exists.

use crate::analytics::category_totals;
use crate::error::Result;

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind, Severity};

pub struct TopCategoryRule;

impl InsightRule for TopCategoryRule {
    fn id(&self) -> &'static str {
        "top_category"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
        let totals = category_totals(ctx.transactions);
        let total: f64 = totals.values().sum();

        // Alphabetically first on ties
        let top = totals
            .into_iter()
            .fold(None::<(String, f64)>, |best, (category, amount)| match best {
                Some((_, best_amount)) if best_amount >= amount => best,
                _ => Some((category, amount)),
            });

        let Some((category, amount)) = top else {
            return Ok(vec![]);
        };
        let share_percent = if total > 0.0 { amount / total * 100.0 } else { 0.0 };

        Ok(vec![Insight::new(
            InsightKind::TopCategory {
                category: category.clone(),
                amount,
                share_percent,
            },
            Severity::Info,
            format!("top_category:{}", category),
        )])
    }
}
