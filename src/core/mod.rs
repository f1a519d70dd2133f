mod calculator;
mod engine;
pub mod region;
mod simulator;
mod types;

pub use calculator::{DeterministicProjection, SAFE_WITHDRAWAL_MULTIPLE, project};
pub use engine::{calculate_retirement, calculate_retirement_with_snapshot};
pub use simulator::{DEFAULT_ITERATIONS, simulate};
pub use types::{
    FinancialSnapshot, LifestyleLevel, MonteCarloResults, ProjectionError, RegionalFactor,
    RetirementGoals, RetirementProjection, RiskTolerance, YearlyProjection,
};
