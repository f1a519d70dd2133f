use super::calculator;
use super::region;
use super::simulator;
use super::types::{FinancialSnapshot, ProjectionError, RetirementGoals, RetirementProjection};
use crate::provider::FinancialDataProvider;

/// Dampening applied to the heuristic readiness score so it stays an
/// optimism-checked estimate rather than a straight-line extrapolation.
const READINESS_DAMPENER: f64 = 0.8;
const CONTRIBUTION_GROWTH_CREDIT: f64 = 1.5;

/// Fetches the user's retirement-savings aggregate and produces a full
/// projection. Provider failures propagate; a zero balance is never
/// silently assumed.
pub fn calculate_retirement(
    goals: &RetirementGoals,
    provider: &dyn FinancialDataProvider,
    user_id: &str,
    iterations: u32,
    seed: u64,
) -> Result<RetirementProjection, ProjectionError> {
    let savings = provider.fetch_current_retirement_savings(user_id)?;
    calculate_retirement_with_snapshot(
        goals,
        FinancialSnapshot {
            current_retirement_savings: savings,
        },
        iterations,
        seed,
    )
}

/// Pure computation core: deterministic projection plus Monte Carlo risk
/// bands over the same starting capital and contribution. Produces a
/// fresh result per call and holds no state between invocations.
pub fn calculate_retirement_with_snapshot(
    goals: &RetirementGoals,
    snapshot: FinancialSnapshot,
    iterations: u32,
    seed: u64,
) -> Result<RetirementProjection, ProjectionError> {
    if goals.target_retirement_age <= goals.current_age {
        return Err(ProjectionError::InvalidHorizon {
            current_age: goals.current_age,
            target_retirement_age: goals.target_retirement_age,
        });
    }

    let factor = region::lookup(&goals.region);
    let deterministic = calculator::project(goals, snapshot, factor);

    let monte_carlo = simulator::simulate(
        deterministic.current_savings,
        deterministic.monthly_contribution_needed,
        deterministic.years_to_retirement,
        goals.expected_return,
        goals.risk_tolerance.volatility(),
        iterations,
        seed,
    );

    let success_probability = readiness_score(
        deterministic.future_current_savings,
        deterministic.monthly_contribution_needed,
        deterministic.years_to_retirement,
        deterministic.total_needed,
    );

    Ok(RetirementProjection {
        total_needed: deterministic.total_needed,
        current_savings: deterministic.current_savings,
        savings_gap: deterministic.savings_gap,
        monthly_contribution_needed: deterministic.monthly_contribution_needed,
        projected_portfolio_value: deterministic.projected_portfolio_value,
        success_probability,
        yearly_projections: deterministic.yearly_projections,
        monte_carlo,
    })
}

/// Heuristic readiness percentage, capped at 100. Deliberately a
/// different lens than the Monte Carlo success rate: it credits planned
/// contributions with modest growth and dampens the ratio, where the
/// simulator measures outcomes against the 25x bar under volatility.
/// Both figures are exposed side by side.
fn readiness_score(
    future_current_savings: f64,
    monthly_contribution: f64,
    years: u32,
    total_needed: f64,
) -> f64 {
    let projected_wealth = future_current_savings
        + monthly_contribution * 12.0 * years as f64 * CONTRIBUTION_GROWTH_CREDIT;
    (projected_wealth / total_needed * 100.0 * READINESS_DAMPENER).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LifestyleLevel, RiskTolerance};
    use crate::provider::InMemoryProvider;
    use proptest::prelude::{any, prop_assert, proptest};

    fn sample_goals() -> RetirementGoals {
        RetirementGoals {
            current_age: 35,
            target_retirement_age: 65,
            desired_monthly_income: 5_000.0,
            inflation_rate: 3.0,
            expected_return: 7.0,
            risk_tolerance: RiskTolerance::Moderate,
            lifestyle_level: LifestyleLevel::Comfortable,
            region: "US".to_string(),
        }
    }

    fn snapshot(savings: f64) -> FinancialSnapshot {
        FinancialSnapshot {
            current_retirement_savings: savings,
        }
    }

    #[test]
    fn rejects_non_positive_horizon() {
        let mut goals = sample_goals();
        goals.target_retirement_age = goals.current_age;
        let err = calculate_retirement_with_snapshot(&goals, snapshot(10_000.0), 100, 42)
            .expect_err("equal ages must be rejected");
        assert!(matches!(err, ProjectionError::InvalidHorizon { .. }));

        goals.target_retirement_age = goals.current_age - 5;
        let err = calculate_retirement_with_snapshot(&goals, snapshot(10_000.0), 100, 42)
            .expect_err("inverted ages must be rejected");
        assert!(matches!(err, ProjectionError::InvalidHorizon { .. }));
    }

    #[test]
    fn provider_failure_propagates_instead_of_assuming_zero() {
        let goals = sample_goals();
        let provider = InMemoryProvider::new();
        let err = calculate_retirement(&goals, &provider, "nobody", 100, 42)
            .expect_err("missing user must fail");
        assert!(matches!(err, ProjectionError::Upstream(_)));
    }

    #[test]
    fn provider_balance_feeds_the_projection() {
        let goals = sample_goals();
        let provider = InMemoryProvider::with_balance("alice", 50_000.0);
        let via_provider = calculate_retirement(&goals, &provider, "alice", 200, 42)
            .expect("projection succeeds");
        let direct = calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 200, 42)
            .expect("projection succeeds");

        assert_eq!(via_provider.current_savings, 50_000.0);
        assert_eq!(via_provider.total_needed, direct.total_needed);
        assert_eq!(
            via_provider.monte_carlo.percentile50,
            direct.monte_carlo.percentile50
        );
    }

    #[test]
    fn unknown_region_matches_us_projection() {
        let mut goals = sample_goals();
        let us = calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 300, 9)
            .expect("projection succeeds");
        goals.region = "XX".to_string();
        let unknown = calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 300, 9)
            .expect("projection succeeds");

        assert_eq!(us.total_needed, unknown.total_needed);
        assert_eq!(us.savings_gap, unknown.savings_gap);
        assert_eq!(us.success_probability, unknown.success_probability);
        assert_eq!(us.monte_carlo.percentile10, unknown.monte_carlo.percentile10);
        assert_eq!(us.yearly_projections, unknown.yearly_projections);
    }

    #[test]
    fn both_probability_lenses_are_reported_distinctly() {
        let goals = sample_goals();
        let projection = calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 500, 42)
            .expect("projection succeeds");

        assert!((0.0..=100.0).contains(&projection.success_probability));
        assert!((0.0..=100.0).contains(&projection.monte_carlo.success_rate));
        // The heuristic score and the simulated rate use different
        // success bars; neither replaces the other.
        assert!(projection.success_probability.is_finite());
    }

    #[test]
    fn readiness_score_caps_at_one_hundred() {
        assert_eq!(readiness_score(1e12, 0.0, 30, 1_000.0), 100.0);
        let modest = readiness_score(100_000.0, 500.0, 30, 3_000_000.0);
        assert!(modest < 100.0);
        assert!(modest > 0.0);
    }

    #[test]
    fn risk_tolerance_changes_only_the_simulated_bands() {
        let mut goals = sample_goals();
        goals.risk_tolerance = RiskTolerance::Conservative;
        let conservative =
            calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 400, 11)
                .expect("projection succeeds");
        goals.risk_tolerance = RiskTolerance::Aggressive;
        let aggressive = calculate_retirement_with_snapshot(&goals, snapshot(50_000.0), 400, 11)
            .expect("projection succeeds");

        assert_eq!(conservative.total_needed, aggressive.total_needed);
        assert_eq!(conservative.savings_gap, aggressive.savings_gap);
        assert_eq!(
            conservative.success_probability,
            aggressive.success_probability
        );
        // Wider volatility spreads the band.
        let conservative_spread =
            conservative.monte_carlo.percentile90 - conservative.monte_carlo.percentile10;
        let aggressive_spread =
            aggressive.monte_carlo.percentile90 - aggressive.monte_carlo.percentile10;
        assert!(aggressive_spread > conservative_spread);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_projection_is_internally_consistent(
            seed in any::<u64>(),
            savings in 0u32..3_000_000,
            monthly_income in 100u32..20_000,
            inflation in 0u32..8,
            expected_return in 0u32..15,
            years in 1u32..50,
            iterations in 1u32..120
        ) {
            let goals = RetirementGoals {
                current_age: 30,
                target_retirement_age: 30 + years,
                desired_monthly_income: monthly_income as f64,
                inflation_rate: inflation as f64,
                expected_return: expected_return as f64,
                risk_tolerance: RiskTolerance::Moderate,
                lifestyle_level: LifestyleLevel::Basic,
                region: "US".to_string(),
            };
            let projection = calculate_retirement_with_snapshot(
                &goals,
                snapshot(savings as f64),
                iterations,
                seed,
            ).expect("valid horizon");

            prop_assert!(projection.current_savings == savings as f64);
            prop_assert!(projection.savings_gap >= 0.0);
            prop_assert!(projection.monthly_contribution_needed >= 0.0);
            prop_assert!((0.0..=100.0).contains(&projection.success_probability));
            prop_assert!((0.0..=100.0).contains(&projection.monte_carlo.success_rate));
            prop_assert!(projection.monte_carlo.percentile10 <= projection.monte_carlo.percentile50);
            prop_assert!(projection.monte_carlo.percentile50 <= projection.monte_carlo.percentile90);
            prop_assert!(projection.yearly_projections.len() == years as usize + 1);
            prop_assert!(projection.total_needed.is_finite());
            prop_assert!(projection.projected_portfolio_value.is_finite());
        }
    }
}
