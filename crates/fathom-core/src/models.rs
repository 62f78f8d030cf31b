//! Domain models for Fathom

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Category label reserved for income rows
pub const INCOME_CATEGORY: &str = "Income";

/// Whether a ledger row is money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger row supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub category: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Create a transaction, normalizing the sign of `amount` from the category
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let amount = if category == INCOME_CATEGORY {
            amount.abs()
        } else {
            -amount.abs()
        };
        Self {
            date,
            category,
            amount,
            description: description.into(),
        }
    }

    /// Derived type: income iff the category is "Income"
    pub fn transaction_type(&self) -> TransactionType {
        if self.category == INCOME_CATEGORY {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type() == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type() == TransactionType::Income
    }

    /// Day of week with Monday = 0
    pub fn day_of_week(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    /// Calendar (year, month) this row falls in
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub current: f64,
    pub target: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl Goal {
    /// Progress toward the target as a percentage.
    ///
    /// A goal with no positive target counts as complete.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            100.0
        } else {
            self.current / self.target * 100.0
        }
    }
}

/// Account balances held outside the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    pub cash: f64,
    pub savings: f64,
    pub investments: f64,
}

impl Balances {
    pub fn total(&self) -> f64 {
        self.cash + self.savings + self.investments
    }
}

/// Everything the caller's session holds for one analytics run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceSession {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub balances: Balances,
}

/// Sum of income rows
pub fn total_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum()
}

/// Absolute sum of expense rows
pub fn total_expenses(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum::<f64>()
        .abs()
}
