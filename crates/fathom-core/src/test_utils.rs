//! Test fixtures for fathom-core
//!
//! Deterministic ledgers shared by the unit tests of every analytics module.

use chrono::NaiveDate;

use crate::models::{Balances, FinanceSession, Goal, Transaction};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Transaction with its sign taken from the category
pub fn tx(date: NaiveDate, category: &str, amount: f64) -> Transaction {
    Transaction::new(date, category, amount, format!("{} purchase", category))
}

/// Three months (Jan-Mar 2026) of ordinary household spending.
///
/// - Dining: a coffee-sized expense almost every other day (frequent, small)
/// - Shopping: two large purchases
/// - Groceries, Utilities, Transport: regular mid-sized rows
/// - Income: one salary per month
///
/// March Dining spend is roughly double February's so month-over-month rules fire.
pub fn sample_ledger() -> Vec<Transaction> {
    let mut txs = Vec::new();

    for month in 1..=3u32 {
        txs.push(tx(date(2026, month, 1), "Income", 3200.0));
        txs.push(tx(date(2026, month, 3), "Utilities", 140.0));
        for week in 0..4u32 {
            let day = 2 + week * 7;
            txs.push(tx(date(2026, month, day), "Groceries", 60.0 + week as f64 * 5.0));
            txs.push(tx(date(2026, month, day + 1), "Transport", 25.0));
        }
        let coffee_days = if month == 3 { 24 } else { 12 };
        for i in 0..coffee_days {
            let day = 1 + (i * 27 / coffee_days.max(1));
            txs.push(tx(date(2026, month, day), "Dining", 6.0 + (i % 4) as f64));
        }
    }

    txs.push(tx(date(2026, 2, 14), "Shopping", 640.0));
    txs.push(tx(date(2026, 3, 20), "Shopping", 910.0));

    txs
}

/// The ledger plus goals and balances
pub fn sample_session() -> FinanceSession {
    FinanceSession {
        transactions: sample_ledger(),
        goals: vec![
            Goal {
                name: "Emergency fund".to_string(),
                current: 2000.0,
                target: 6000.0,
                target_date: None,
            },
            Goal {
                name: "Holiday".to_string(),
                current: 900.0,
                target: 1200.0,
                target_date: Some(date(2026, 8, 1)),
            },
        ],
        balances: Balances {
            cash: 1500.0,
            savings: 4000.0,
            investments: 2500.0,
        },
    }
}
