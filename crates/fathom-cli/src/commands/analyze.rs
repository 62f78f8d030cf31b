//! Ledger analysis commands (report, predict, clusters, budget, health, insights)

use anyhow::{Context, Result};
use fathom_core::analytics::{
    next_month, summarize, BudgetOptimizer, BudgetOutcome, ClusterSummary, ExpensePredictor,
    HealthComponent, HealthScore, HealthScorer, SpendingClusterer,
};
use fathom_core::insights::{InsightContext, InsightEngine, InsightRenderer, TextRenderer};
use fathom_core::{AnalysisRequest, AnalyticsConfig, AnalyticsEngine, InvestmentRequest};

use super::core::{load_session, parse_as_of, print_json};
use crate::cli::LedgerArgs;

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

pub fn cmd_report(
    config: &AnalyticsConfig,
    ledger: &LedgerArgs,
    target: Option<f64>,
    investment: Option<InvestmentRequest>,
    json: bool,
) -> Result<()> {
    let session = load_session(ledger)?;
    let request = AnalysisRequest {
        as_of: parse_as_of(ledger.as_of.as_deref())?,
        target_savings: target,
        investment,
    };

    let report = AnalyticsEngine::new(config.clone())
        .analyze(&session, &request)
        .context("Analysis failed")?;

    if json {
        return print_json(&report);
    }

    let symbol = &config.insights.currency_symbol;
    println!();
    println!("📒 Fathom Report (as of {})", report.as_of);
    println!("{}", RULE);
    print_health(&report.health);

    println!();
    println!("🔮 Predicted spending for month {}", report.predicted_month);
    for (category, amount) in &report.predictions {
        println!("   {:24} {}{:>10.2}", category, symbol, amount);
    }

    println!();
    print_clusters(&report.cluster_summaries, symbol);

    if let Some(budget) = &report.budget {
        println!();
        print_budget(budget, symbol);
    }

    if let Some(projection) = &report.investment {
        println!();
        println!("📈 Investment projection ({} risk)", projection.risk_level);
        for (p, value) in &projection.percentiles {
            println!("   P{:<3} {}{:.2}", p, symbol, value);
        }
    }

    println!();
    println!("💎 Recommended tier: {}", report.tier);

    println!();
    print_insights(&report.insight_text);
    Ok(())
}

pub fn cmd_predict(
    config: &AnalyticsConfig,
    ledger: &LedgerArgs,
    month: Option<u32>,
    json: bool,
) -> Result<()> {
    let session = load_session(ledger)?;
    let month = match month {
        Some(m) if (1..=12).contains(&m) => m,
        Some(m) => anyhow::bail!("Invalid --month {} (use 1-12)", m),
        None => {
            let as_of = parse_as_of(ledger.as_of.as_deref())?
                .or_else(|| session.transactions.iter().map(|t| t.date).max())
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            next_month(as_of)
        }
    };

    let model = ExpensePredictor::new(config.predictor.clone())
        .train(&session.transactions)
        .context("Failed to train expense predictor")?;
    let predictions = model.predict_next_period(&session.transactions, month)?;

    if json {
        return print_json(&predictions);
    }

    println!();
    println!("🔮 Predicted spending for month {}", month);
    println!("   Trained on {} expense rows", model.training_rows());
    println!("{}", RULE);
    if predictions.is_empty() {
        println!("   No expenses to predict.");
        return Ok(());
    }
    let symbol = &config.insights.currency_symbol;
    for (category, amount) in &predictions {
        println!("   {:24} {}{:>10.2}", category, symbol, amount);
    }
    println!("{}", RULE);
    println!(
        "   {:24} {}{:>10.2}",
        "Total",
        symbol,
        predictions.values().sum::<f64>()
    );
    Ok(())
}

pub fn cmd_clusters(config: &AnalyticsConfig, ledger: &LedgerArgs, json: bool) -> Result<()> {
    let session = load_session(ledger)?;
    let clustering = SpendingClusterer::new(config.clustering.clone())
        .cluster(&session.transactions)
        .context("Clustering failed")?;

    if json {
        return print_json(&clustering.labeled);
    }

    println!();
    print_clusters(&summarize(&clustering.labeled), &config.insights.currency_symbol);
    Ok(())
}

pub fn cmd_budget(
    config: &AnalyticsConfig,
    ledger: &LedgerArgs,
    target: f64,
    json: bool,
) -> Result<()> {
    let session = load_session(ledger)?;
    let outcome = BudgetOptimizer::new(config.budget.clone())
        .optimize(&session.transactions, target)
        .context("Budget optimization failed")?;

    if json {
        return print_json(&outcome);
    }

    println!();
    print_budget(&outcome, &config.insights.currency_symbol);
    Ok(())
}

pub fn cmd_health(config: &AnalyticsConfig, ledger: &LedgerArgs, json: bool) -> Result<()> {
    let session = load_session(ledger)?;
    let score = HealthScorer::new(config.health.clone())
        .score(&session.transactions, &session.goals, &session.balances)
        .context("Health scoring failed")?;

    if json {
        return print_json(&score);
    }

    println!();
    print_health(&score);
    Ok(())
}

pub fn cmd_insights(config: &AnalyticsConfig, ledger: &LedgerArgs, json: bool) -> Result<()> {
    let session = load_session(ledger)?;
    let as_of = parse_as_of(ledger.as_of.as_deref())?
        .or_else(|| session.transactions.iter().map(|t| t.date).max())
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let clustering = SpendingClusterer::new(config.clustering.clone())
        .cluster(&session.transactions)
        .context("Clustering failed")?;
    let scorer = HealthScorer::new(config.health.clone());
    let health = scorer
        .score(&session.transactions, &session.goals, &session.balances)
        .context("Health scoring failed")?;

    let ctx = InsightContext {
        transactions: &session.transactions,
        clusters: &clustering.labeled,
        health: Some(&health),
        as_of,
        window_months: scorer.window_months(&session.transactions),
        config: &config.insights,
    };
    let insights = InsightEngine::new().generate(&ctx);

    if json {
        return print_json(&insights);
    }

    let text = TextRenderer::new(config.insights.currency_symbol.clone()).render_all(&insights);
    println!();
    print_insights(&text);
    Ok(())
}

fn print_health(score: &HealthScore) {
    println!("❤️  Financial Health: {}/100", score.overall);
    for component in HealthComponent::ALL {
        println!("   {:20} {:>5.1}", component.as_str(), score.component(component));
    }
    let m = &score.metrics;
    println!(
        "   Savings rate {:.1}% · Emergency fund {:.1} months · Investments {:.1}%",
        m.savings_rate, m.emergency_fund_months, m.investment_ratio
    );
}

fn print_clusters(summaries: &[ClusterSummary], symbol: &str) {
    println!("🧩 Spending Clusters");
    println!("{}", RULE);
    if summaries.is_empty() {
        println!("   No expenses to cluster.");
        return;
    }
    println!(
        "   {:>3} │ {:>5} │ {:>11} │ {:>10} │ Top category",
        "#", "Rows", "Total", "Average"
    );
    for s in summaries {
        println!(
            "   {:>3} │ {:>5} │ {}{:>10.2} │ {}{:>9.2} │ {}",
            s.cluster, s.count, symbol, s.total, symbol, s.mean, s.top_category
        );
    }
}

fn print_budget(outcome: &BudgetOutcome, symbol: &str) {
    println!("💰 Budget Plan");
    println!("{}", RULE);
    match outcome {
        BudgetOutcome::AlreadyMet { current_savings } => {
            println!(
                "   ✅ Target already met: current savings {}{:.2}",
                symbol, current_savings
            );
        }
        BudgetOutcome::Plan(plan) => {
            println!(
                "   Target {}{:.2} · current {}{:.2} · projected {}{:.2}",
                symbol,
                plan.target_savings,
                symbol,
                plan.current_savings,
                symbol,
                plan.projected_savings
            );
            println!(
                "   {:20} │ {:>11} │ {:>11} │ Weight",
                "Category", "Ceiling", "Cut"
            );
            for (category, ceiling) in &plan.ceilings {
                println!(
                    "   {:20} │ {}{:>10.2} │ {}{:>10.2} │ {:.1}",
                    category,
                    symbol,
                    ceiling,
                    symbol,
                    plan.reductions.get(category).copied().unwrap_or(0.0),
                    plan.weights.get(category).copied().unwrap_or(0.0)
                );
            }
            if plan.projected_savings < plan.target_savings {
                println!("   ⚠️  Plan falls short of the target");
            }
        }
    }
}

fn print_insights(lines: &[String]) {
    println!("💡 Insights");
    println!("{}", RULE);
    if lines.is_empty() {
        println!("   Nothing notable yet.");
    }
    for (i, line) in lines.iter().enumerate() {
        println!("   {}. {}", i + 1, line);
    }
}
