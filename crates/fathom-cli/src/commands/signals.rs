//! Tier, sentiment and config commands

use std::path::Path;

use anyhow::{Context, Result};
use fathom_core::analytics::{analyze_sentiment, recommend_tier, SubscriptionSignals};
use fathom_core::config::default_config_path;
use fathom_core::AnalyticsConfig;
use serde_json::json;

use super::core::{load_session, print_json};
use crate::cli::LedgerArgs;

pub fn cmd_tier(ledger: &LedgerArgs, json: bool) -> Result<()> {
    let session = load_session(ledger)?;
    let signals = SubscriptionSignals::from_session(&session);
    let tier = recommend_tier(&signals);

    if json {
        return print_json(&json!({
            "tier": tier,
            "score": signals.score(),
            "signals": signals,
        }));
    }

    println!();
    println!("💎 Recommended tier: {}", tier);
    println!("   Score {}/8", signals.score());
    println!(
        "   Income {:.2} · {} goals · {} transactions · assets {:.2}",
        signals.income, signals.goal_count, signals.transaction_count, signals.assets
    );
    Ok(())
}

pub fn cmd_sentiment(text: &str, json: bool) -> Result<()> {
    let report = analyze_sentiment(text).context("Sentiment analysis failed")?;

    if json {
        return print_json(&report);
    }

    println!(
        "{} (score {:+.2}, {} positive / {} negative words)",
        report.classification, report.score, report.positive_words, report.negative_words
    );
    Ok(())
}

pub fn cmd_config(config: &AnalyticsConfig, explicit: Option<&Path>) -> Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    println!("# Source: {}", source);
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render config")?
    );
    Ok(())
}
