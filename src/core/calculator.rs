use super::types::{FinancialSnapshot, RegionalFactor, RetirementGoals, YearlyProjection};

/// 4% safe withdrawal rule: required capital is 25x the annual income
/// need. Industry heuristic, not derived.
pub const SAFE_WITHDRAWAL_MULTIPLE: f64 = 25.0;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Output of the deterministic accumulation-phase projection. Carries a
/// few intermediates the orchestrator needs beyond the published result.
#[derive(Debug, Clone)]
pub struct DeterministicProjection {
    pub total_needed: f64,
    pub current_savings: f64,
    pub future_current_savings: f64,
    pub savings_gap: f64,
    pub monthly_contribution_needed: f64,
    pub projected_portfolio_value: f64,
    pub adjusted_return: f64,
    pub years_to_retirement: u32,
    pub yearly_projections: Vec<YearlyProjection>,
}

/// Projects the deterministic path from today's balance to the target
/// retirement age. Assumes a positive horizon; the orchestrator rejects
/// `target_retirement_age <= current_age` before calling this.
pub fn project(
    goals: &RetirementGoals,
    snapshot: FinancialSnapshot,
    factor: RegionalFactor,
) -> DeterministicProjection {
    let years = goals.years_to_retirement();
    let current_savings = snapshot.current_retirement_savings;

    let adjusted_inflation = goals.inflation_rate * factor.inflation_multiplier;
    // Taxation is applied as a multiplicative drag so it scales with the
    // return level.
    let adjusted_return = goals.expected_return * (1.0 - factor.tax_rate);

    let future_annual_income = goals.desired_monthly_income
        * MONTHS_PER_YEAR
        * (1.0 + adjusted_inflation / 100.0).powi(years as i32);
    let total_needed = future_annual_income * SAFE_WITHDRAWAL_MULTIPLE;

    let future_current_savings =
        current_savings * (1.0 + adjusted_return / 100.0).powi(years as i32);

    let savings_gap = (total_needed - future_current_savings).max(0.0);
    let monthly_contribution_needed = annuity_payment(savings_gap, adjusted_return, years);

    let yearly_projections = build_schedule(
        goals.current_age,
        years,
        current_savings,
        adjusted_return,
        monthly_contribution_needed,
    );
    let projected_portfolio_value = yearly_projections
        .last()
        .map(|y| y.portfolio_value)
        .unwrap_or(current_savings);

    DeterministicProjection {
        total_needed,
        current_savings,
        future_current_savings,
        savings_gap,
        monthly_contribution_needed,
        projected_portfolio_value,
        adjusted_return,
        years_to_retirement: years,
        yearly_projections,
    }
}

/// Solves the future-value-of-an-annuity equation for the monthly payment
/// that closes `gap` over `years * 12` periods at `annual_rate` percent.
fn annuity_payment(gap: f64, annual_rate: f64, years: u32) -> f64 {
    if gap <= 0.0 {
        return 0.0;
    }

    let n = years as f64 * MONTHS_PER_YEAR;
    let monthly_rate = annual_rate / 100.0 / MONTHS_PER_YEAR;
    if monthly_rate == 0.0 {
        // Zero rate degenerates the annuity factor to n.
        return gap / n;
    }

    let factor = ((1.0 + monthly_rate).powf(n) - 1.0) / monthly_rate;
    gap / factor
}

/// Year-by-year accumulation schedule, ages current..=target inclusive.
/// The first entry records the starting balance before any growth;
/// withdrawals stay zero in this accumulation-only model.
fn build_schedule(
    current_age: u32,
    years: u32,
    current_savings: f64,
    adjusted_return: f64,
    monthly_contribution: f64,
) -> Vec<YearlyProjection> {
    let annual_contribution = monthly_contribution * MONTHS_PER_YEAR;
    let growth = 1.0 + adjusted_return / 100.0;

    let mut schedule = Vec::with_capacity(years as usize + 1);
    let mut portfolio_value = current_savings;
    for i in 0..=years {
        if i > 0 {
            portfolio_value = portfolio_value * growth + annual_contribution;
        }
        schedule.push(YearlyProjection {
            age: current_age + i,
            portfolio_value,
            contributions: annual_contribution,
            withdrawals: 0.0,
        });
    }
    schedule
}
