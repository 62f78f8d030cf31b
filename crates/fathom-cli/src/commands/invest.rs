//! Investment projection command

use anyhow::{Context, Result};
use fathom_core::analytics::{InvestmentSimulator, RiskLevel};
use fathom_core::AnalyticsConfig;

use super::core::print_json;
use crate::cli::InvestArgs;

pub fn cmd_invest(config: &AnalyticsConfig, params: &InvestArgs, json: bool) -> Result<()> {
    let risk = RiskLevel::parse_lossy(&params.risk);
    let projection = InvestmentSimulator::new(config.investment.clone())
        .simulate(params.principal, params.monthly, params.years, risk)
        .context("Simulation failed")?;

    if json {
        return print_json(&projection);
    }

    let symbol = &config.insights.currency_symbol;
    println!();
    println!(
        "📈 Investment Projection: {}{:.2} + {}{:.2}/month for {} years ({} risk)",
        symbol, params.principal, symbol, params.monthly, params.years, risk
    );
    println!("   ─────────────────────────────────────────────────────────────");
    for (p, value) in &projection.percentiles {
        println!("   P{:<3} {}{:>14.2}", p, symbol, value);
    }
    println!("   Expected {}{:.2}", symbol, projection.expected_value);

    // One line per year of the median path
    println!();
    println!("   {:>4} │ {:>14}", "Year", "Median path");
    for point in projection.median_path.iter().filter(|p| p.period % 12 == 0) {
        println!("   {:>4} │ {}{:>13.2}", point.period / 12, symbol, point.value);
    }
    Ok(())
}
