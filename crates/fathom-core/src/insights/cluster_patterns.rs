//! Cluster Pattern Rule
//!
//! Reads the spending clusters and calls out two shapes:
//! many small expenses (the "latte factor") and a few large ones that are
//! worth budgeting for monthly.

use crate::analytics::summarize;
use crate::error::Result;

use super::engine::{InsightContext, InsightRule};
use super::types::{Insight, InsightKind, Severity};

pub struct ClusterPatternRule;

impl InsightRule for ClusterPatternRule {
    fn id(&self) -> &'static str {
        "cluster_patterns"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
        let config = ctx.config;
        let months = ctx.window_months.max(1) as f64;
        let mut insights = Vec::new();

        for summary in summarize(ctx.clusters) {
            if summary.count > config.frequent_min_count
                && summary.mean < config.frequent_max_mean
            {
                insights.push(Insight::new(
                    InsightKind::FrequentSmallExpenses {
                        count: summary.count,
                        average: summary.mean,
                        total: summary.total,
                        top_category: summary.top_category.clone(),
                    },
                    Severity::Attention,
                    format!("cluster:{}:frequent", summary.cluster),
                ));
            } else if summary.count < config.occasional_max_count
                && summary.mean > config.occasional_min_mean
            {
                insights.push(Insight::new(
                    InsightKind::LargeOccasionalExpenses {
                        count: summary.count,
                        average: summary.mean,
                        total: summary.total,
                        top_category: summary.top_category.clone(),
                        monthly_budget: summary.total / months,
                    },
                    Severity::Info,
                    format!("cluster:{}:occasional", summary.cluster),
                ));
            }
        }

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::LabeledTransaction;
    use crate::config::InsightConfig;
    use crate::insights::InsightEngine;
    use crate::test_utils::{date, tx};

    fn labeled(cluster: usize, category: &str, amount: f64, day: u32) -> LabeledTransaction {
        LabeledTransaction {
            transaction: tx(date(2026, 1, day), category, amount),
            cluster,
        }
    }

    fn run(clusters: &[LabeledTransaction], window_months: u32) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = InsightContext {
            transactions: &[],
            clusters,
            health: None,
            as_of: date(2026, 1, 31),
            window_months,
            config: &config,
        };
        ClusterPatternRule.evaluate(&ctx).unwrap()
    }

    #[test]
    fn test_frequent_small() {
        let clusters: Vec<_> = (1..=11).map(|d| labeled(0, "Dining", 5.0, d)).collect();
        let insights = run(&clusters, 1);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].key, "cluster:0:frequent");
        match &insights[0].kind {
            InsightKind::FrequentSmallExpenses { count, total, .. } => {
                assert_eq!(*count, 11);
                assert_eq!(*total, 55.0);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_exactly_ten_is_not_frequent() {
        let clusters: Vec<_> = (1..=10).map(|d| labeled(0, "Dining", 5.0, d)).collect();
        assert!(run(&clusters, 1).is_empty());
    }

    #[test]
    fn test_large_occasional_budget_uses_window() {
        let clusters = vec![
            labeled(2, "Shopping", 600.0, 3),
            labeled(2, "Shopping", 900.0, 17),
            labeled(2, "Travel", 300.0, 20),
        ];
        let insights = run(&clusters, 3);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].key, "cluster:2:occasional");
        match &insights[0].kind {
            InsightKind::LargeOccasionalExpenses {
                monthly_budget,
                average,
                ..
            } => {
                assert_eq!(*monthly_budget, 600.0);
                assert_eq!(*average, 600.0);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_middling_cluster_ignored() {
        let clusters = vec![
            labeled(1, "Groceries", 60.0, 2),
            labeled(1, "Groceries", 70.0, 9),
        ];
        assert!(run(&clusters, 1).is_empty());
    }

    #[test]
    fn test_clusters_sharing_top_category_kept_apart() {
        let mut clusters: Vec<_> = (1..=11).map(|d| labeled(0, "Dining", 3.0, d)).collect();
        clusters.extend((1..=12).map(|d| labeled(1, "Dining", 15.0, d)));

        let insights = run(&clusters, 1);
        let keys: Vec<&str> = insights.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["cluster:0:frequent", "cluster:1:frequent"]);

        let config = InsightConfig::default();
        let ctx = InsightContext {
            transactions: &[],
            clusters: &clusters,
            health: None,
            as_of: date(2026, 1, 31),
            window_months: 1,
            config: &config,
        };
        let generated = InsightEngine::new().generate(&ctx);
        assert_eq!(generated.len(), 2);
        assert!(generated
            .iter()
            .all(|i| matches!(i.kind, InsightKind::FrequentSmallExpenses { .. })));
    }
}
