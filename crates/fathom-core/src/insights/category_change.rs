//! Category Change Rule
//!
//! Compares each category's spend in the reference month with the previous
//! calendar month. Increases past the threshold are a warning; decreases
//! past it are praise. Skipped unless both months have expense rows and
//! the category had spend in the previous month.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::error::Result;
use crate::models::Transaction;

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind, Severity};

pub struct CategoryChangeRule;

/// Calendar month before the one `date` falls in
fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

fn month_spend(transactions: &[Transaction], year_month: (i32, u32)) -> BTreeMap<&str, f64> {
    let mut spend = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.is_expense() && t.year_month() == year_month)
    {
        *spend.entry(t.category.as_str()).or_insert(0.0) += t.amount.abs();
    }
    spend
}

impl InsightRule for CategoryChangeRule {
    fn id(&self) -> &'static str {
        "category_change"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
        let current = month_spend(ctx.transactions, (ctx.as_of.year(), ctx.as_of.month()));
        let previous = month_spend(ctx.transactions, previous_month(ctx.as_of));
        if current.is_empty() || previous.is_empty() {
            return Ok(vec![]);
        }

        let threshold = ctx.config.change_threshold_percent;
        let mut insights = Vec::new();

        let categories: BTreeSet<&str> = current.keys().chain(previous.keys()).copied().collect();

        for category in categories {
            let now = current.get(category).copied().unwrap_or(0.0);
            let before = previous.get(category).copied().unwrap_or(0.0);
            if before <= 0.0 {
                continue;
            }
            let change_percent = (now - before) / before * 100.0;
            let severity = if change_percent > threshold {
                Severity::Warning
            } else if change_percent < -threshold {
                Severity::Info
            } else {
                continue;
            };

            insights.push(Insight::new(
                InsightKind::CategoryChange {
                    category: category.to_string(),
                    previous: before,
                    current: now,
                    change_percent,
                },
                severity,
                format!("category_change:{}", category),
            ));
        }

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::test_utils::{date, tx};

    fn run(transactions: &[Transaction], as_of: NaiveDate) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = InsightContext {
            transactions,
            clusters: &[],
            health: None,
            as_of,
            window_months: 2,
            config: &config,
        };
        CategoryChangeRule.evaluate(&ctx).unwrap()
    }

    fn change(insight: &Insight) -> f64 {
        match &insight.kind {
            InsightKind::CategoryChange { change_percent, .. } => *change_percent,
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_increase_and_decrease() {
        let ledger = vec![
            tx(date(2026, 2, 3), "Dining", 100.0),
            tx(date(2026, 2, 4), "Shopping", 200.0),
            tx(date(2026, 2, 5), "Groceries", 100.0),
            tx(date(2026, 3, 3), "Dining", 150.0),
            tx(date(2026, 3, 4), "Shopping", 100.0),
            tx(date(2026, 3, 5), "Groceries", 110.0),
        ];
        let insights = run(&ledger, date(2026, 3, 31));

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].key, "category_change:Dining");
        assert_eq!(insights[0].severity, Severity::Warning);
        assert_eq!(change(&insights[0]), 50.0);
        assert_eq!(insights[1].key, "category_change:Shopping");
        assert_eq!(insights[1].severity, Severity::Info);
        assert_eq!(change(&insights[1]), -50.0);
    }

    #[test]
    fn test_january_compares_with_december() {
        let ledger = vec![
            tx(date(2025, 12, 10), "Dining", 100.0),
            tx(date(2026, 1, 10), "Dining", 300.0),
        ];
        let insights = run(&ledger, date(2026, 1, 15));
        assert_eq!(insights.len(), 1);
        assert_eq!(change(&insights[0]), 200.0);
    }

    #[test]
    fn test_category_dropped_to_zero_is_praised() {
        let ledger = vec![
            tx(date(2026, 2, 3), "Dining", 100.0),
            tx(date(2026, 2, 4), "Shopping", 200.0),
            tx(date(2026, 3, 3), "Dining", 100.0),
        ];
        let insights = run(&ledger, date(2026, 3, 31));

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].key, "category_change:Shopping");
        assert_eq!(insights[0].severity, Severity::Info);
        assert_eq!(change(&insights[0]), -100.0);
        match &insights[0].kind {
            InsightKind::CategoryChange { current, .. } => assert_eq!(*current, 0.0),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_new_category_skipped() {
        let ledger = vec![
            tx(date(2026, 2, 3), "Dining", 100.0),
            tx(date(2026, 3, 3), "Dining", 100.0),
            tx(date(2026, 3, 4), "Travel", 900.0),
        ];
        assert!(run(&ledger, date(2026, 3, 31)).is_empty());
    }

    #[test]
    fn test_missing_previous_month_skipped() {
        let ledger = vec![tx(date(2026, 3, 3), "Dining", 100.0)];
        assert!(run(&ledger, date(2026, 3, 31)).is_empty());
    }
}
