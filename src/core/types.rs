use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;

/// Drives simulated return volatility, not the deterministic return.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Annual return volatility in percentage points.
    pub fn volatility(self) -> f64 {
        match self {
            RiskTolerance::Conservative => 8.0,
            RiskTolerance::Moderate => 12.0,
            RiskTolerance::Aggressive => 18.0,
        }
    }
}

/// Informational only: frames the desired income upstream, the engine
/// never reinterprets it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LifestyleLevel {
    Basic,
    Comfortable,
    Luxury,
}

#[derive(Debug, Clone)]
pub struct RetirementGoals {
    pub current_age: u32,
    pub target_retirement_age: u32,
    pub desired_monthly_income: f64,
    pub inflation_rate: f64,
    pub expected_return: f64,
    pub risk_tolerance: RiskTolerance,
    pub lifestyle_level: LifestyleLevel,
    pub region: String,
}

impl RetirementGoals {
    pub fn years_to_retirement(&self) -> u32 {
        self.target_retirement_age.saturating_sub(self.current_age)
    }
}

/// Aggregate of all retirement-account balances, supplied by the
/// financial data provider.
#[derive(Debug, Clone, Copy)]
pub struct FinancialSnapshot {
    pub current_retirement_savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalFactor {
    pub inflation_multiplier: f64,
    pub tax_rate: f64,
    pub social_security_replacement_ratio: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub age: u32,
    pub portfolio_value: f64,
    pub contributions: f64,
    pub withdrawals: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResults {
    pub percentile10: f64,
    pub percentile50: f64,
    pub percentile90: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProjection {
    pub total_needed: f64,
    pub current_savings: f64,
    pub savings_gap: f64,
    pub monthly_contribution_needed: f64,
    pub projected_portfolio_value: f64,
    pub success_probability: f64,
    pub yearly_projections: Vec<YearlyProjection>,
    pub monte_carlo: MonteCarloResults,
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error(
        "target retirement age ({target_retirement_age}) must be greater than current age ({current_age})"
    )]
    InvalidHorizon {
        current_age: u32,
        target_retirement_age: u32,
    },
    #[error("failed to fetch retirement savings: {0}")]
    Upstream(#[from] ProviderError),
}
