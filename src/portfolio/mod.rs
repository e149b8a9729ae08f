//! Forward projection of portfolio value.

pub mod goals;
pub mod monte_carlo;

pub use goals::{corpus_for_expenses, future_value, plan_goal, required_payment, GoalInputs, GoalPlan};
pub use monte_carlo::{
    deterministic_projection, simulate, simulate_market_path, PercentileSeries, Quantile,
    SimulationOutput, SimulationParams, PERCENTILES,
};
