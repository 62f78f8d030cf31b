//! Core types for the Insight Generator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health area a piece of advice is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTopic {
    /// Savings rate sub-score below the healthy band
    LowSavings,
    /// Savings rate sub-score comfortably high
    StrongSavings,
    EmergencyFund,
    Investing,
    Goals,
}

impl AdviceTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceTopic::LowSavings => "low_savings",
            AdviceTopic::StrongSavings => "strong_savings",
            AdviceTopic::EmergencyFund => "emergency_fund",
            AdviceTopic::Investing => "investing",
            AdviceTopic::Goals => "goals",
        }
    }
}

impl fmt::Display for AdviceTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdviceTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low_savings" => Ok(AdviceTopic::LowSavings),
            "strong_savings" => Ok(AdviceTopic::StrongSavings),
            "emergency_fund" => Ok(AdviceTopic::EmergencyFund),
            "investing" => Ok(AdviceTopic::Investing),
            "goals" => Ok(AdviceTopic::Goals),
            _ => Err(format!("Unknown advice topic: {}", s)),
        }
    }
}

/// What an insight says, as structured data. Rendering to text is separate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightKind {
    /// A cluster of many small expenses
    FrequentSmallExpenses {
        count: usize,
        average: f64,
        total: f64,
        top_category: String,
    },
    /// A cluster of a few large expenses
    LargeOccasionalExpenses {
        count: usize,
        average: f64,
        total: f64,
        top_category: String,
        /// Suggested monthly set-aside (total spread over the ledger window)
        monthly_budget: f64,
    },
    /// Highest-spend category and its share of all expenses
    TopCategory {
        category: String,
        amount: f64,
        share_percent: f64,
    },
    /// Month-over-month change in one category (signed percent)
    CategoryChange {
        category: String,
        previous: f64,
        current: f64,
        change_percent: f64,
    },
    HealthAdvice { topic: AdviceTopic },
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::FrequentSmallExpenses { .. } => "frequent_small_expenses",
            InsightKind::LargeOccasionalExpenses { .. } => "large_occasional_expenses",
            InsightKind::TopCategory { .. } => "top_category",
            InsightKind::CategoryChange { .. } => "category_change",
            InsightKind::HealthAdvice { .. } => "health_advice",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational or praise - no action needed
    Info,
    /// Worth attention but not urgent
    Attention,
    /// Should be addressed soon
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "attention" => Ok(Severity::Attention),
            "warning" => Ok(Severity::Warning),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A single generated insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(flatten)]
    pub kind: InsightKind,
    pub severity: Severity,
    /// Unique key for deduplication (e.g., "category_change:Dining")
    pub key: String,
}

impl Insight {
    pub fn new(kind: InsightKind, severity: Severity, key: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            key: key.into(),
        }
    }
}
