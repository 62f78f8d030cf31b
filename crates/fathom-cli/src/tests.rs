//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use fathom_core::AnalyticsConfig;
use fathom_core::analytics::RiskLevel;
use fathom_core::InvestmentRequest;
use tempfile::{NamedTempFile, TempDir};

use crate::cli::{InvestArgs, LedgerArgs};
use crate::commands;

const LEDGER: &str = "\
date,category,amount,description
2026-01-01,Income,3200.00,Salary
2026-01-03,Groceries,-82.10,Supermarket
2026-01-05,Dining,-4.50,Coffee
2026-01-06,Dining,-5.20,Coffee
2026-01-09,Utilities,-140.00,Power
2026-01-14,Groceries,-76.40,Supermarket
2026-01-20,Shopping,-420.00,Headphones
2026-02-01,Income,3200.00,Salary
2026-02-03,Groceries,-91.30,Supermarket
2026-02-04,Dining,-4.80,Coffee
2026-02-11,Dining,-6.10,Lunch
2026-02-12,Utilities,-155.00,Power
2026-02-17,Groceries,-88.00,Supermarket
2026-02-25,Travel,-310.00,Train tickets
";

fn config() -> AnalyticsConfig {
    AnalyticsConfig::embedded().unwrap()
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn ledger_args(file: &NamedTempFile) -> LedgerArgs {
    LedgerArgs {
        file: file.path().to_path_buf(),
        goals: None,
        cash: 1500.0,
        savings: 2500.0,
        investments: 800.0,
        as_of: None,
    }
}

// ========== Session Loading Tests ==========

#[test]
fn test_load_session_reads_ledger_and_balances() {
    let ledger = write_file(LEDGER);
    let session = commands::load_session(&ledger_args(&ledger)).unwrap();

    assert_eq!(session.transactions.len(), 14);
    assert!(session.goals.is_empty());
    assert_eq!(session.balances.total(), 4800.0);
}

#[test]
fn test_load_session_with_goals() {
    let ledger = write_file(LEDGER);
    let goals = write_file(r#"[{"name": "Bike", "current": 150, "target": 600}]"#);

    let mut args = ledger_args(&ledger);
    args.goals = Some(goals.path().to_path_buf());

    let session = commands::load_session(&args).unwrap();
    assert_eq!(session.goals.len(), 1);
    assert_eq!(session.goals[0].name, "Bike");
}

#[test]
fn test_load_session_missing_file() {
    let dir = TempDir::new().unwrap();
    let args = LedgerArgs {
        file: dir.path().join("missing.csv"),
        goals: None,
        cash: 0.0,
        savings: 0.0,
        investments: 0.0,
        as_of: None,
    };

    let err = commands::load_session(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to open ledger"));
}

#[test]
fn test_load_session_bad_row() {
    let ledger = write_file("date,category,amount\n2026-01-01,Dining,lots\n");
    let result = commands::load_session(&ledger_args(&ledger));
    assert!(result.is_err());
}

#[test]
fn test_parse_as_of() {
    assert_eq!(commands::parse_as_of(None).unwrap(), None);
    assert_eq!(
        commands::parse_as_of(Some("2026-02-28")).unwrap(),
        NaiveDate::from_ymd_opt(2026, 2, 28)
    );

    let err = commands::parse_as_of(Some("28/02/2026")).unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));
}

#[test]
fn test_load_config_defaults_and_override() {
    assert!(commands::load_config(None).is_ok());

    let custom = write_file("[insights]\ncurrency_symbol = \"$\"\n");
    let config = commands::load_config(Some(custom.path())).unwrap();
    assert_eq!(config.insights.currency_symbol, "$");

    let missing = PathBuf::from("/nonexistent/fathom.toml");
    assert!(commands::load_config(Some(&missing)).is_err());
}

// ========== Analysis Command Tests ==========

#[test]
fn test_cmd_report() {
    let ledger = write_file(LEDGER);
    let investment = InvestmentRequest {
        principal: 1000.0,
        monthly_contribution: 100.0,
        years: 5,
        risk_level: RiskLevel::Low,
    };

    let result = commands::cmd_report(
        &config(),
        &ledger_args(&ledger),
        Some(2800.0),
        Some(investment),
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_report_json_with_as_of() {
    let ledger = write_file(LEDGER);
    let mut args = ledger_args(&ledger);
    args.as_of = Some("2026-02-28".to_string());

    let result = commands::cmd_report(&config(), &args, None, None, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_report_rejects_bad_as_of() {
    let ledger = write_file(LEDGER);
    let mut args = ledger_args(&ledger);
    args.as_of = Some("yesterday".to_string());

    assert!(commands::cmd_report(&config(), &args, None, None, false).is_err());
}

#[test]
fn test_cmd_predict() {
    let ledger = write_file(LEDGER);
    assert!(commands::cmd_predict(&config(), &ledger_args(&ledger), None, false).is_ok());
    assert!(commands::cmd_predict(&config(), &ledger_args(&ledger), Some(7), true).is_ok());
}

#[test]
fn test_cmd_predict_invalid_month() {
    let ledger = write_file(LEDGER);
    let err = commands::cmd_predict(&config(), &ledger_args(&ledger), Some(13), false)
        .unwrap_err();
    assert!(err.to_string().contains("1-12"));
}

#[test]
fn test_cmd_clusters() {
    let ledger = write_file(LEDGER);
    assert!(commands::cmd_clusters(&config(), &ledger_args(&ledger), false).is_ok());
    assert!(commands::cmd_clusters(&config(), &ledger_args(&ledger), true).is_ok());
}

#[test]
fn test_cmd_clusters_income_only() {
    let ledger = write_file("date,category,amount\n2026-01-01,Income,3200\n");
    assert!(commands::cmd_clusters(&config(), &ledger_args(&ledger), false).is_ok());
}

#[test]
fn test_cmd_budget() {
    let ledger = write_file(LEDGER);
    // Current savings are well above 1000, so this is already met
    assert!(commands::cmd_budget(&config(), &ledger_args(&ledger), 1000.0, false).is_ok());
    assert!(commands::cmd_budget(&config(), &ledger_args(&ledger), 5600.0, true).is_ok());
}

#[test]
fn test_cmd_health() {
    let ledger = write_file(LEDGER);
    assert!(commands::cmd_health(&config(), &ledger_args(&ledger), false).is_ok());
}

#[test]
fn test_cmd_insights() {
    let ledger = write_file(LEDGER);
    assert!(commands::cmd_insights(&config(), &ledger_args(&ledger), false).is_ok());
    assert!(commands::cmd_insights(&config(), &ledger_args(&ledger), true).is_ok());
}

// ========== Standalone Command Tests ==========

#[test]
fn test_cmd_invest() {
    let params = InvestArgs {
        principal: 5000.0,
        monthly: 200.0,
        years: 3,
        risk: "high".to_string(),
    };
    assert!(commands::cmd_invest(&config(), &params, false).is_ok());
}

#[test]
fn test_cmd_invest_unknown_risk_falls_back() {
    let params = InvestArgs {
        principal: 1000.0,
        monthly: 0.0,
        years: 1,
        risk: "reckless".to_string(),
    };
    assert!(commands::cmd_invest(&config(), &params, true).is_ok());
}

#[test]
fn test_cmd_invest_non_finite_principal() {
    let params = InvestArgs {
        principal: f64::NAN,
        monthly: 0.0,
        years: 1,
        risk: "low".to_string(),
    };
    assert!(commands::cmd_invest(&config(), &params, false).is_err());
}

#[test]
fn test_cmd_tier() {
    let ledger = write_file(LEDGER);
    assert!(commands::cmd_tier(&ledger_args(&ledger), false).is_ok());
    assert!(commands::cmd_tier(&ledger_args(&ledger), true).is_ok());
}

#[test]
fn test_cmd_sentiment() {
    assert!(commands::cmd_sentiment("I love saving, it feels great", false).is_ok());
    assert!(commands::cmd_sentiment("", true).is_ok());
}

#[test]
fn test_cmd_config() {
    assert!(commands::cmd_config(&config(), None).is_ok());
}
