//! Expense Predictor
//!
//! Learns the absolute amount of an expense row from its category, month and
//! weekday, then estimates next-period spending for each category.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::Result;
use crate::models::Transaction;

use super::features::{build_feature_matrix, validate_transactions, FeatureLayout, FeatureSchema};
use super::forest::RandomForest;

/// A fitted regressor plus the schema it was trained on. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedExpenseModel {
    forest: RandomForest,
    schema: FeatureSchema,
    training_rows: usize,
}

impl TrainedExpenseModel {
    /// Ordered feature names fixed at training time
    pub fn feature_names(&self) -> Vec<String> {
        self.schema.names()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    /// Predicted spend for every non-income category in `transactions`.
    ///
    /// Each category is scored with a vector holding only its own indicator
    /// and the target month's indicator. A category the model never saw keeps
    /// an all-zero category dimension and gets the model's baseline.
    pub fn predict_next_period(
        &self,
        transactions: &[Transaction],
        target_month: u32,
    ) -> Result<BTreeMap<String, f64>> {
        validate_transactions(transactions)?;

        let predictions: BTreeMap<String, f64> = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.category.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|category| {
                let features = self.schema.indicator_vector(category, target_month);
                (category.to_string(), self.forest.predict(features.as_slice()))
            })
            .collect();

        debug!(
            categories = predictions.len(),
            month = target_month,
            "Predicted next-period expenses"
        );
        Ok(predictions)
    }
}

/// Trains [`TrainedExpenseModel`]s
pub struct ExpensePredictor {
    config: PredictorConfig,
}

impl Default for ExpensePredictor {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}

impl ExpensePredictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Fit on every expense row; target is the absolute amount
    pub fn train(&self, transactions: &[Transaction]) -> Result<TrainedExpenseModel> {
        let matrix = build_feature_matrix(transactions, FeatureLayout::Predictor)?;
        let targets: Vec<f64> = matrix
            .source_rows
            .iter()
            .map(|&i| transactions[i].amount.abs())
            .collect();

        let forest = RandomForest::fit(&matrix.to_rows(), &targets, &self.config);

        debug!(
            rows = targets.len(),
            features = matrix.schema.len(),
            trees = forest.n_trees(),
            "Trained expense predictor"
        );

        Ok(TrainedExpenseModel {
            forest,
            schema: matrix.schema,
            training_rows: targets.len(),
        })
    }
}

/// Month following the one `reference` falls in (December wraps to January)
pub fn next_month(reference: NaiveDate) -> u32 {
    reference.month() % 12 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::{date, sample_ledger, tx};

    fn small_config() -> PredictorConfig {
        PredictorConfig {
            n_trees: 25,
            ..Default::default()
        }
    }

    #[test]
    fn test_next_month_wraps() {
        assert_eq!(next_month(date(2026, 12, 31)), 1);
        assert_eq!(next_month(date(2026, 3, 1)), 4);
    }

    #[test]
    fn test_feature_names_stable() {
        let ledger = sample_ledger();
        let predictor = ExpensePredictor::new(small_config());
        let a = predictor.train(&ledger).unwrap();
        let b = predictor.train(&ledger).unwrap();

        assert_eq!(a.feature_names(), b.feature_names());
        assert!(a.feature_names().contains(&"category_Shopping".to_string()));
        assert!(!a.feature_names().contains(&"category_Income".to_string()));
        assert_eq!(a.training_rows(), ledger.iter().filter(|t| t.is_expense()).count());
    }

    #[test]
    fn test_predicts_every_training_category() {
        let ledger = sample_ledger();
        let model = ExpensePredictor::new(small_config()).train(&ledger).unwrap();
        let predictions = model.predict_next_period(&ledger, 4).unwrap();

        let keys: Vec<&str> = predictions.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Dining", "Groceries", "Shopping", "Transport", "Utilities"]
        );
        assert!(predictions.values().all(|v| v.is_finite() && *v >= 0.0));
        // Large purchases dominate the Shopping rows
        assert!(predictions["Shopping"] > predictions["Dining"]);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let ledger = sample_ledger();
        let model = ExpensePredictor::new(small_config()).train(&ledger).unwrap();

        let first = model.predict_next_period(&ledger, 2).unwrap();
        let second = model.predict_next_period(&ledger, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_category_gets_baseline() {
        let ledger = sample_ledger();
        let model = ExpensePredictor::new(small_config()).train(&ledger).unwrap();

        let mut extended = ledger.clone();
        extended.push(tx(date(2026, 3, 30), "Pets", 80.0));
        let predictions = model.predict_next_period(&extended, 4).unwrap();

        assert!(predictions["Pets"].is_finite());
    }

    #[test]
    fn test_no_expenses_predicts_nothing() {
        let income_only = vec![tx(date(2026, 1, 1), "Income", 1000.0)];
        let model = ExpensePredictor::default().train(&income_only).unwrap();

        assert_eq!(model.training_rows(), 0);
        assert!(model.predict_next_period(&income_only, 2).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_rows_rejected() {
        let mut bad = tx(date(2026, 1, 1), "Dining", 10.0);
        bad.amount = f64::INFINITY;

        let result = ExpensePredictor::default().train(&[bad]);
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
