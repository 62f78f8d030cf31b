//! Ledger and goal file parsers
//!
//! Ledger CSV columns (header required, order free, case-insensitive):
//! `date,category,amount,description` - `description` is optional.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Goal, Transaction};

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
        };

        Ok(Self {
            date: require("date")?,
            category: require("category")?,
            amount: require("amount")?,
            description: find("description"),
        })
    }
}

/// Parse a ledger CSV into transactions.
///
/// Amount signs are normalized from the category ("Income" positive,
/// everything else negative), so both signed and unsigned exports load.
pub fn parse_ledger_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Import(format!("line {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, "date")?)
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;
        let category = field(columns.category, "category")?;
        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::Import(format!("line {}: {}", line, e)))?;
        let description = columns
            .description
            .and_then(|idx| record.get(idx))
            .unwrap_or_default();

        transactions.push(Transaction::new(date, category, amount, description));
    }

    debug!("Parsed {} ledger rows", transactions.len());
    Ok(transactions)
}

/// Parse a JSON array of goals
pub fn parse_goals_json<R: Read>(reader: R) -> Result<Vec<Goal>> {
    let goals: Vec<Goal> = serde_json::from_reader(reader)?;
    debug!("Parsed {} goals", goals.len());
    Ok(goals)
}

/// Parse a date string (ISO first, then common bank formats)
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2026-01-15
        "%Y/%m/%d", // 2026/01/15
        "%d.%m.%Y", // 15.01.2026
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '€', '£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("15.01.2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("€1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_ledger() {
        let csv = "date,category,amount,description
2026-01-01,Income,3200,Salary
2026-01-03,Groceries,-64.20,Market
2026-01-04,Dining,12.50,";

        let transactions = parse_ledger_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].transaction_type(), TransactionType::Income);
        assert_eq!(transactions[0].amount, 3200.0);
        assert_eq!(transactions[1].amount, -64.20);
        assert_eq!(transactions[1].description, "Market");
        // Unsigned expense normalized
        assert_eq!(transactions[2].amount, -12.50);
        assert_eq!(transactions[2].description, "");
    }

    #[test]
    fn test_columns_any_order_no_description() {
        let csv = "Amount,Date,Category
25.00,2026-02-01,Transport";

        let transactions = parse_ledger_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].category, "Transport");
        assert_eq!(transactions[0].amount, -25.0);
    }

    #[test]
    fn test_bad_row_names_line() {
        let csv = "date,category,amount
2026-01-01,Income,100
2026-01-02,Dining,lots";

        let err = parse_ledger_csv(csv.as_bytes()).unwrap_err();
        match err {
            Error::Import(msg) => assert!(msg.starts_with("line 3:"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_category() {
        let csv = "date,category,amount
2026-01-02,,10";
        assert!(matches!(
            parse_ledger_csv(csv.as_bytes()),
            Err(Error::Import(_))
        ));
    }

    #[test]
    fn test_missing_column() {
        let csv = "date,amount\n2026-01-02,10";
        assert!(matches!(
            parse_ledger_csv(csv.as_bytes()),
            Err(Error::Import(_))
        ));
    }

    #[test]
    fn test_parse_goals() {
        let json = r#"[
            {"name": "Emergency fund", "current": 2000, "target": 6000},
            {"name": "Holiday", "current": 900, "target": 1200, "target_date": "2026-08-01"}
        ]"#;

        let goals = parse_goals_json(json.as_bytes()).unwrap();
        assert_eq!(goals.len(), 2);
        assert!(goals[0].target_date.is_none());
        assert_eq!(
            goals[1].target_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_goals_invalid() {
        assert!(matches!(
            parse_goals_json("{".as_bytes()),
            Err(Error::Json(_))
        ));
    }
}
