//! Investment Simulator
//!
//! Monte Carlo projection of a portfolio with monthly compounding and a
//! fixed monthly contribution. Monthly returns are drawn from
//! `Normal(annual_return / 12, annual_volatility / sqrt(12))`.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InvestmentConfig;
use crate::error::{Error, Result};

/// Risk appetite selecting a row of the risk table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a level, falling back to medium for anything unrecognized
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            warn!(level = s, "Unknown risk level, using medium");
            Self::Medium
        })
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Portfolio value at the end of a month (period 0 = start)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProjection {
    pub risk_level: RiskLevel,
    /// The simulated path whose terminal value is closest to the median
    pub median_path: Vec<ProjectionPoint>,
    /// Percentile rank -> terminal value
    pub percentiles: BTreeMap<u8, f64>,
    /// Median terminal value
    pub expected_value: f64,
}

impl InvestmentProjection {
    pub fn terminal_value(&self) -> f64 {
        self.median_path.last().map_or(0.0, |p| p.value)
    }
}

pub struct InvestmentSimulator {
    config: InvestmentConfig,
}

impl Default for InvestmentSimulator {
    fn default() -> Self {
        Self::new(InvestmentConfig::default())
    }
}

impl InvestmentSimulator {
    pub fn new(config: InvestmentConfig) -> Self {
        Self { config }
    }

    pub fn simulate(
        &self,
        principal: f64,
        monthly_contribution: f64,
        years: u32,
        risk_level: RiskLevel,
    ) -> Result<InvestmentProjection> {
        if !principal.is_finite() || !monthly_contribution.is_finite() {
            return Err(Error::InvalidData(
                "principal and contribution must be finite".into(),
            ));
        }

        let profile = self.config.risk_profiles.for_level(risk_level);
        let monthly = Normal::new(
            profile.annual_return / 12.0,
            profile.annual_volatility / 12f64.sqrt(),
        )
        .map_err(|e| Error::InvalidData(format!("Invalid {} risk profile: {}", risk_level, e)))?;

        let months = years * 12;
        let n_paths = self.config.n_paths.max(1);
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let paths: Vec<Vec<f64>> = (0..n_paths)
            .map(|_| {
                let mut path = Vec::with_capacity(months as usize + 1);
                let mut value = principal;
                path.push(value);
                for _ in 0..months {
                    let r = monthly.sample(&mut rng);
                    value = value * (1.0 + r) + monthly_contribution;
                    path.push(value);
                }
                path
            })
            .collect();

        let mut terminal: Vec<f64> = paths.iter().map(|p| p[p.len() - 1]).collect();
        terminal.sort_by(|a, b| a.total_cmp(b));

        let percentiles: BTreeMap<u8, f64> = self
            .config
            .percentiles
            .iter()
            .map(|&p| (p, percentile(&terminal, p as f64)))
            .collect();
        let expected_value = percentile(&terminal, 50.0);

        let median_idx = paths
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p[p.len() - 1] - expected_value).abs()))
            .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
            .0;
        let median_path = paths[median_idx]
            .iter()
            .enumerate()
            .map(|(i, &value)| ProjectionPoint {
                period: i as u32,
                value,
            })
            .collect();

        debug!(
            paths = n_paths,
            months,
            risk = %risk_level,
            expected_value,
            "Simulated investment paths"
        );

        Ok(InvestmentProjection {
            risk_level,
            median_path,
            percentiles,
            expected_value,
        })
    }
}

/// Percentile of sorted values with linear interpolation between ranks
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
