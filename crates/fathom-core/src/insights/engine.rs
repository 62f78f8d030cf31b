//! Insight Engine - runs insight rules and ranks their output

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::analytics::{HealthScore, LabeledTransaction};
use crate::config::InsightConfig;
use crate::models::Transaction;
use crate::Result;

use super::types::Insight;
use super::{CategoryChangeRule, ClusterPatternRule, HealthAdviceRule, TopCategoryRule};

/// Context provided to insight rules
pub struct InsightContext<'a> {
    pub transactions: &'a [Transaction],
    /// Cluster-labeled expense rows (empty when clustering produced nothing)
    pub clusters: &'a [LabeledTransaction],
    pub health: Option<&'a HealthScore>,
    /// Reference date: its calendar month is "this month"
    pub as_of: NaiveDate,
    /// Months the ledger covers, for per-month figures
    pub window_months: u32,
    pub config: &'a InsightConfig,
}

/// Trait for insight rules
pub trait InsightRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Rank of this rule's output (lower comes first)
    fn priority(&self) -> u8;

    /// Inspect the context and produce insights
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Result<Vec<Insight>>;
}

/// Runs registered rules, then orders, de-duplicates and caps the result
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(ClusterPatternRule));
        engine.register(Box::new(TopCategoryRule));
        engine.register(Box::new(CategoryChangeRule));
        engine.register(Box::new(HealthAdviceRule));

        engine
    }

    /// Register an insight rule
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run all rules and return at most `config.max_insights` insights
    pub fn generate(&self, ctx: &InsightContext<'_>) -> Vec<Insight> {
        let mut ranked: Vec<(u8, Insight)> = vec![];

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Ok(insights) => {
                    tracing::debug!(
                        rule = rule.id(),
                        count = insights.len(),
                        "Insight rule complete"
                    );
                    ranked.extend(insights.into_iter().map(|i| (rule.priority(), i)));
                }
                Err(e) => {
                    tracing::warn!(rule = rule.id(), error = %e, "Insight rule failed");
                }
            }
        }

        // Stable: rules of equal priority keep registration order
        ranked.sort_by_key(|(priority, _)| *priority);

        let mut seen = HashSet::new();
        let insights: Vec<Insight> = ranked
            .into_iter()
            .map(|(_, insight)| insight)
            .filter(|insight| seen.insert(insight.key.clone()))
            .take(ctx.config.max_insights)
            .collect();

        tracing::debug!(count = insights.len(), "Generated insights");
        insights
    }

    /// Identifiers of the registered rules
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::insights::types::{AdviceTopic, InsightKind, Severity};
    use crate::test_utils::date;

    struct FixedRule {
        id: &'static str,
        priority: u8,
        keys: Vec<&'static str>,
    }

    impl InsightRule for FixedRule {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn evaluate(&self, _ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
            Ok(self
                .keys
                .iter()
                .map(|k| {
                    Insight::new(
                        InsightKind::HealthAdvice {
                            topic: AdviceTopic::Goals,
                        },
                        Severity::Info,
                        *k,
                    )
                })
                .collect())
        }
    }

    struct FailingRule;

    impl InsightRule for FailingRule {
        fn id(&self) -> &'static str {
            "failing"
        }

        fn priority(&self) -> u8 {
            0
        }

        fn evaluate(&self, _ctx: &InsightContext<'_>) -> Result<Vec<Insight>> {
            Err(Error::InvalidData("boom".into()))
        }
    }

    fn context(config: &InsightConfig) -> InsightContext<'_> {
        InsightContext {
            transactions: &[],
            clusters: &[],
            health: None,
            as_of: date(2026, 3, 31),
            window_months: 1,
            config,
        }
    }

    #[test]
    fn test_builtin_rules_registered() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_ids(),
            vec!["cluster_patterns", "top_category", "category_change", "health_advice"]
        );
    }

    #[test]
    fn test_orders_by_priority_and_dedups() {
        let mut engine = InsightEngine { rules: vec![] };
        engine.register(Box::new(FixedRule {
            id: "late",
            priority: 9,
            keys: vec!["b", "a"],
        }));
        engine.register(Box::new(FixedRule {
            id: "early",
            priority: 1,
            keys: vec!["a", "c"],
        }));
        engine.register(Box::new(FailingRule));

        let config = InsightConfig::default();
        let keys: Vec<String> = engine
            .generate(&context(&config))
            .into_iter()
            .map(|i| i.key)
            .collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_capped() {
        let mut engine = InsightEngine { rules: vec![] };
        engine.register(Box::new(FixedRule {
            id: "many",
            priority: 1,
            keys: vec!["1", "2", "3", "4", "5", "6", "7"],
        }));

        let config = InsightConfig::default();
        assert_eq!(engine.generate(&context(&config)).len(), 5);

        let tight = InsightConfig {
            max_insights: 2,
            ..Default::default()
        };
        assert_eq!(engine.generate(&context(&tight)).len(), 2);
    }

    #[test]
    fn test_empty_context_no_insights() {
        let config = InsightConfig::default();
        assert!(InsightEngine::new().generate(&context(&config)).is_empty());
    }
}
