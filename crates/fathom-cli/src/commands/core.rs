//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the analytics config
//! - `load_session` - Read the ledger, goals and balances into a session
//! - `parse_as_of` - Parse the `--as-of` reference date
//! - `print_json` - Pretty-print any serializable output

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fathom_core::import::{parse_goals_json, parse_ledger_csv};
use fathom_core::{AnalyticsConfig, Balances, FinanceSession};
use serde::Serialize;

use crate::cli::LedgerArgs;

/// Load the analytics config (explicit path, user override, or built-in)
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    AnalyticsConfig::load(path).context("Failed to load analytics config")
}

/// Build a session from the ledger arguments
pub fn load_session(args: &LedgerArgs) -> Result<FinanceSession> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open ledger {}", args.file.display()))?;
    let transactions = parse_ledger_csv(file)
        .with_context(|| format!("Failed to parse ledger {}", args.file.display()))?;

    let goals = match &args.goals {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open goals {}", path.display()))?;
            parse_goals_json(file)
                .with_context(|| format!("Failed to parse goals {}", path.display()))?
        }
        None => vec![],
    };

    tracing::debug!(
        transactions = transactions.len(),
        goals = goals.len(),
        "Loaded session"
    );

    Ok(FinanceSession {
        transactions,
        goals,
        balances: Balances {
            cash: args.cash,
            savings: args.savings,
            investments: args.investments,
        },
    })
}

pub fn parse_as_of(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .context("Invalid --as-of date format (use YYYY-MM-DD)")
        })
        .transpose()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
