//! Fathom CLI - Personal finance analytics
//!
//! Usage:
//!   fathom report --file ledger.csv --target 500     Full analytics report
//!   fathom predict --file ledger.csv                 Next-month spending
//!   fathom health --file ledger.csv --savings 4000   Financial health score
//!   fathom invest --principal 1000 --years 20        Investment projection

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use fathom_core::analytics::RiskLevel;
use fathom_core::InvestmentRequest;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            ledger,
            target,
            principal,
            monthly,
            years,
            risk,
        } => {
            let investment = principal.map(|principal| InvestmentRequest {
                principal,
                monthly_contribution: monthly,
                years,
                risk_level: RiskLevel::parse_lossy(&risk),
            });
            commands::cmd_report(&config, &ledger, target, investment, cli.json)
        }
        Commands::Predict { ledger, month } => {
            commands::cmd_predict(&config, &ledger, month, cli.json)
        }
        Commands::Clusters { ledger } => commands::cmd_clusters(&config, &ledger, cli.json),
        Commands::Budget { ledger, target } => {
            commands::cmd_budget(&config, &ledger, target, cli.json)
        }
        Commands::Health { ledger } => commands::cmd_health(&config, &ledger, cli.json),
        Commands::Insights { ledger } => commands::cmd_insights(&config, &ledger, cli.json),
        Commands::Invest { params } => commands::cmd_invest(&config, &params, cli.json),
        Commands::Tier { ledger } => commands::cmd_tier(&ledger, cli.json),
        Commands::Sentiment { text } => commands::cmd_sentiment(&text, cli.json),
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
    }
}
