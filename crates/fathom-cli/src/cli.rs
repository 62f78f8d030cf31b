//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fathom - Personal finance analytics
#[derive(Parser)]
#[command(name = "fathom")]
#[command(about = "Spending predictions, clusters, budgets and financial health from a ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (defaults to ~/.config/fathom/analytics.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Ledger inputs shared by the analysis commands
#[derive(Args, Debug, Clone)]
pub struct LedgerArgs {
    /// Ledger CSV (date,category,amount,description)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Goals JSON file (array of {name, current, target, target_date?})
    #[arg(short, long)]
    pub goals: Option<PathBuf>,

    /// Cash balance
    #[arg(long, default_value = "0")]
    pub cash: f64,

    /// Savings balance
    #[arg(long, default_value = "0")]
    pub savings: f64,

    /// Investment balance
    #[arg(long, default_value = "0")]
    pub investments: f64,

    /// Reference date for "this month" (YYYY-MM-DD, defaults to the latest ledger date)
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Monte Carlo projection parameters
#[derive(Args, Debug, Clone)]
pub struct InvestArgs {
    /// Starting amount
    #[arg(long)]
    pub principal: f64,

    /// Amount added every month
    #[arg(long, default_value = "0")]
    pub monthly: f64,

    /// Horizon in years
    #[arg(long, default_value = "10")]
    pub years: u32,

    /// Risk level: low, medium, high (unknown values fall back to medium)
    #[arg(long, default_value = "medium")]
    pub risk: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every model and print the full report
    Report {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Savings target for a budget plan
        #[arg(long)]
        target: Option<f64>,

        /// Include an investment projection starting from this amount
        #[arg(long)]
        principal: Option<f64>,

        /// Monthly contribution for the projection
        #[arg(long, default_value = "0")]
        monthly: f64,

        /// Projection horizon in years
        #[arg(long, default_value = "10")]
        years: u32,

        /// Projection risk level
        #[arg(long, default_value = "medium")]
        risk: String,
    },

    /// Predict next month's spending per category
    Predict {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Target month (1-12, defaults to the month after --as-of)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Group expenses into spending clusters
    Clusters {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Build a budget plan that reaches a savings target
    Budget {
        #[command(flatten)]
        ledger: LedgerArgs,

        /// Savings target
        #[arg(long)]
        target: f64,
    },

    /// Score financial health
    Health {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Generate ranked insights
    Insights {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Project an investment with Monte Carlo simulation
    Invest {
        #[command(flatten)]
        params: InvestArgs,
    },

    /// Recommend a subscription tier
    Tier {
        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Score the sentiment of a financial note or headline
    Sentiment {
        /// Text to analyze
        text: String,
    },

    /// Show the resolved analytics configuration
    Config,
}
