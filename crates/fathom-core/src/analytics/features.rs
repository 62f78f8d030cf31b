//! Feature Builder
//!
//! Turns ledger rows into fixed-schema numeric vectors. A [`FeatureSchema`]
//! is declared once from training data and then reused unchanged for every
//! later encoding on the same model: categories or months it has never seen
//! simply leave every indicator at zero.

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};

/// One named column of a feature vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeatureField {
    AmountAbs,
    DayOfMonth,
    /// Ordinal, Monday = 0
    DayOfWeek,
    /// One-hot month indicator (1-12)
    Month(u32),
    /// One-hot category indicator
    Category(String),
}

impl FeatureField {
    pub fn name(&self) -> String {
        match self {
            Self::AmountAbs => "amount_abs".to_string(),
            Self::DayOfMonth => "day_of_month".to_string(),
            Self::DayOfWeek => "day_of_week".to_string(),
            Self::Month(m) => format!("month_{}", m),
            Self::Category(c) => format!("category_{}", c),
        }
    }

    fn value_for(&self, tx: &Transaction) -> f64 {
        match self {
            Self::AmountAbs => tx.amount.abs(),
            Self::DayOfMonth => tx.date.day() as f64,
            Self::DayOfWeek => tx.day_of_week() as f64,
            Self::Month(m) => indicator(tx.date.month() == *m),
            Self::Category(c) => indicator(tx.category == *c),
        }
    }
}

fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Which consumer a schema is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// day_of_week, month one-hots, category one-hots
    Predictor,
    /// amount_abs, day_of_month, day_of_week, category one-hots
    Clustering,
}

/// Ordered, immutable list of feature columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    layout: FeatureLayout,
    fields: Vec<FeatureField>,
}

/// A single encoded row, ordered like its schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FeatureSchema {
    /// Declare the schema from the expense rows a model is trained on.
    ///
    /// Categories and months are sorted so the column order only depends on
    /// which values occur, not on row order.
    pub fn declare(layout: FeatureLayout, expenses: &[&Transaction]) -> Self {
        let categories: BTreeSet<&str> = expenses.iter().map(|t| t.category.as_str()).collect();

        let mut fields = match layout {
            FeatureLayout::Predictor => {
                let months: BTreeSet<u32> = expenses.iter().map(|t| t.date.month()).collect();
                let mut fields = vec![FeatureField::DayOfWeek];
                fields.extend(months.into_iter().map(FeatureField::Month));
                fields
            }
            FeatureLayout::Clustering => vec![
                FeatureField::AmountAbs,
                FeatureField::DayOfMonth,
                FeatureField::DayOfWeek,
            ],
        };
        fields.extend(
            categories
                .into_iter()
                .map(|c| FeatureField::Category(c.to_string())),
        );

        Self { layout, fields }
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    /// Canonical ordered feature names
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(FeatureField::name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Category labels the schema has an indicator for
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| match f {
            FeatureField::Category(c) => Some(c.as_str()),
            _ => None,
        })
    }

    /// Encode one transaction
    pub fn encode(&self, tx: &Transaction) -> FeatureVector {
        FeatureVector(self.fields.iter().map(|f| f.value_for(tx)).collect())
    }

    /// A vector with only the given category and month indicators set.
    ///
    /// Either may be unknown to the schema, in which case its dimension stays zero.
    pub fn indicator_vector(&self, category: &str, month: u32) -> FeatureVector {
        FeatureVector(
            self.fields
                .iter()
                .map(|f| match f {
                    FeatureField::Category(c) => indicator(c == category),
                    FeatureField::Month(m) => indicator(*m == month),
                    _ => 0.0,
                })
                .collect(),
        )
    }
}

/// Encoded expense rows plus the schema that produced them
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub schema: FeatureSchema,
    pub rows: Vec<FeatureVector>,
    /// Index of each row in the caller's transaction slice
    pub source_rows: Vec<usize>,
}

impl FeatureMatrix {
    /// Rows as plain slices, for the numeric primitives
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.as_slice().to_vec()).collect()
    }
}

/// Validate every row and build the feature matrix for the expense rows
pub fn build_feature_matrix(
    transactions: &[Transaction],
    layout: FeatureLayout,
) -> Result<FeatureMatrix> {
    let (source_rows, expenses) = expense_rows(transactions)?;
    let schema = FeatureSchema::declare(layout, &expenses);
    let rows = expenses.iter().map(|t| schema.encode(t)).collect();

    tracing::debug!(
        layout = ?layout,
        rows = source_rows.len(),
        features = schema.len(),
        "Built feature matrix"
    );

    Ok(FeatureMatrix {
        schema,
        rows,
        source_rows,
    })
}

/// Validate every row, returning the expense rows with their indices
pub fn expense_rows(transactions: &[Transaction]) -> Result<(Vec<usize>, Vec<&Transaction>)> {
    validate_transactions(transactions)?;
    Ok(transactions
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_expense())
        .unzip())
}

/// Fail fast on the first malformed row
pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    transactions
        .iter()
        .enumerate()
        .try_for_each(|(i, t)| validate_transaction(i, t))
}

fn validate_transaction(index: usize, tx: &Transaction) -> Result<()> {
    if tx.category.trim().is_empty() {
        return Err(Error::Validation(format!(
            "row {} ({}): missing category",
            index, tx.date
        )));
    }
    if !tx.amount.is_finite() {
        return Err(Error::Validation(format!(
            "row {} ({}): amount is not a finite number",
            index, tx.date
        )));
    }
    let consistent = match tx.transaction_type() {
        TransactionType::Expense => tx.amount <= 0.0,
        TransactionType::Income => tx.amount >= 0.0,
    };
    if !consistent {
        return Err(Error::Validation(format!(
            "row {} ({}): {} amount {} has the wrong sign",
            index,
            tx.date,
            tx.transaction_type(),
            tx.amount
        )));
    }
    Ok(())
}
