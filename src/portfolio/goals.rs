//! Goal planning: how far current savings plus regular contributions go
//! toward a target expressed in today's money.
//!
//! Amounts follow a "money you hold" sign convention: savings and
//! contributions are positive, withdrawals negative. Contributions land at the
//! end of each period.

use serde::{Deserialize, Serialize};

use crate::core::error::SeerError;
use crate::core::Result;

/// Value after `periods` periods of `present` compounding at `rate`, plus a
/// `payment` added at the end of every period.
pub fn future_value(rate: f64, periods: f64, payment: f64, present: f64) -> f64 {
    if rate == 0.0 {
        return present + payment * periods;
    }
    let growth = (1.0 + rate).powf(periods);
    present * growth + payment * (growth - 1.0) / rate
}

/// End-of-period payment that grows `present` into `target` over `periods`
/// periods at `rate`. Negative when `present` alone overshoots the target.
pub fn required_payment(rate: f64, periods: f64, present: f64, target: f64) -> Result<f64> {
    if !(periods > 0.0) {
        return Err(SeerError::invalid_parameter(format!(
            "periods must be positive, got {periods}"
        )));
    }
    if rate == 0.0 {
        return Ok((target - present) / periods);
    }
    let growth = (1.0 + rate).powf(periods);
    Ok((target - present * growth) * rate / (growth - 1.0))
}

/// Corpus whose `withdrawal_rate` share covers a year of `monthly_expenses`
/// after `years` of inflation.
pub fn corpus_for_expenses(
    monthly_expenses: f64,
    inflation_rate: f64,
    years: f64,
    withdrawal_rate: f64,
) -> Result<f64> {
    if !(withdrawal_rate > 0.0 && withdrawal_rate <= 1.0) {
        return Err(SeerError::invalid_parameter(format!(
            "withdrawal_rate must be in (0, 1], got {withdrawal_rate}"
        )));
    }
    let future_monthly = future_value(inflation_rate, years, 0.0, monthly_expenses);
    Ok(future_monthly * 12.0 / withdrawal_rate)
}

/// Inputs of a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalInputs {
    /// Goal in today's money.
    pub target: f64,
    pub current_savings: f64,
    /// Added at the end of every period.
    pub periodic_contribution: f64,
    pub years: f64,
    /// Annual expected return as a fraction.
    pub expected_return: f64,
    /// Annual inflation as a fraction.
    pub inflation_rate: f64,
    /// 12 for monthly contributions.
    pub periods_per_year: f64,
}

impl Default for GoalInputs {
    fn default() -> Self {
        Self {
            target: 100_000.0,
            current_savings: 10_000.0,
            periodic_contribution: 500.0,
            years: 10.0,
            expected_return: 0.08,
            inflation_rate: 0.03,
            periods_per_year: 12.0,
        }
    }
}

impl GoalInputs {
    fn validate(&self) -> Result<()> {
        let fail = |name: &str, rule: &str, value: f64| -> Result<()> {
            Err(SeerError::invalid_parameter(format!("{name} must be {rule}, got {value}")))
        };

        if !(self.target.is_finite() && self.target >= 0.0) {
            return fail("target", "non-negative", self.target);
        }
        if !(self.current_savings.is_finite() && self.current_savings >= 0.0) {
            return fail("current_savings", "non-negative", self.current_savings);
        }
        if !self.periodic_contribution.is_finite() {
            return fail("periodic_contribution", "finite", self.periodic_contribution);
        }
        if !(self.years.is_finite() && self.years > 0.0) {
            return fail("years", "positive", self.years);
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return fail("periods_per_year", "positive", self.periods_per_year);
        }
        for (name, rate) in [("expected_return", self.expected_return), ("inflation_rate", self.inflation_rate)] {
            if !(rate.is_finite() && rate > -1.0) {
                return fail(name, "finite and above -1", rate);
            }
        }
        Ok(())
    }
}

/// Where a savings plan ends up relative to its goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPlan {
    /// Target after inflation over the horizon.
    pub inflated_target: f64,
    /// Savings plus contributions grown at the expected return.
    pub projected_value: f64,
    /// `inflated_target - projected_value`; negative is a surplus.
    pub shortfall: f64,
    /// Per-period contribution that closes the gap exactly.
    pub required_contribution: f64,
}

impl GoalPlan {
    #[inline]
    pub fn on_track(&self) -> bool {
        self.shortfall <= 0.0
    }
}

/// Project the plan described by `inputs`.
///
/// Inflation compounds yearly; savings and contributions compound once per
/// contribution period.
pub fn plan_goal(inputs: &GoalInputs) -> Result<GoalPlan> {
    if let Err(err) = inputs.validate() {
        tracing::warn!(error = %err, "rejecting goal inputs");
        return Err(err);
    }

    let rate = inputs.expected_return / inputs.periods_per_year;
    let periods = inputs.years * inputs.periods_per_year;

    let inflated_target = future_value(inputs.inflation_rate, inputs.years, 0.0, inputs.target);
    let projected_value =
        future_value(rate, periods, inputs.periodic_contribution, inputs.current_savings);
    let required_contribution =
        required_payment(rate, periods, inputs.current_savings, inflated_target)?;

    let plan = GoalPlan {
        inflated_target,
        projected_value,
        shortfall: inflated_target - projected_value,
        required_contribution,
    };
    tracing::debug!(shortfall = plan.shortfall, required = plan.required_contribution, "planned goal");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_value() {
        assert!((future_value(0.1, 2.0, 0.0, 1_000.0) - 1_210.0).abs() < 1e-9);
        assert!((future_value(0.1, 3.0, 100.0, 0.0) - 331.0).abs() < 1e-9);
        assert_eq!(future_value(0.0, 12.0, 50.0, 400.0), 1_000.0);
    }

    #[test]
    fn test_required_payment_reaches_target() {
        let payment = required_payment(0.005, 120.0, 2_000.0, 50_000.0).unwrap();
        let reached = future_value(0.005, 120.0, payment, 2_000.0);
        assert!((reached - 50_000.0).abs() < 1e-6);

        assert_eq!(required_payment(0.0, 10.0, 100.0, 600.0).unwrap(), 50.0);
        // savings alone overshoot
        assert!(required_payment(0.01, 12.0, 10_000.0, 1_000.0).unwrap() < 0.0);
        assert!(required_payment(0.01, 0.0, 0.0, 1_000.0).is_err());
    }

    #[test]
    fn test_corpus_for_expenses() {
        // 1,000 a month with no inflation at a 4% withdrawal rate
        let corpus = corpus_for_expenses(1_000.0, 0.0, 20.0, 0.04).unwrap();
        assert!((corpus - 300_000.0).abs() < 1e-6);
        assert!(corpus_for_expenses(1_000.0, 0.03, 20.0, 0.0).is_err());
    }

    #[test]
    fn test_plan_shortfall_and_required_contribution() {
        let inputs = GoalInputs::default();
        let plan = plan_goal(&inputs).unwrap();

        let inflated = 100_000.0 * 1.03f64.powi(10);
        assert!((plan.inflated_target - inflated).abs() < 1e-6);
        assert!((plan.shortfall - (plan.inflated_target - plan.projected_value)).abs() < 1e-9);

        let funded = GoalInputs { periodic_contribution: plan.required_contribution, ..inputs };
        let closed = plan_goal(&funded).unwrap();
        assert!(closed.shortfall.abs() < 1e-6);
        assert!(closed.on_track());
    }

    #[test]
    fn test_plan_surplus() {
        let inputs = GoalInputs { target: 1_000.0, current_savings: 50_000.0, ..GoalInputs::default() };
        let plan = plan_goal(&inputs).unwrap();
        assert!(plan.on_track());
        assert!(plan.shortfall < 0.0);
        assert!(plan.required_contribution < 0.0);
    }

    #[test]
    fn test_plan_rejects_bad_inputs() {
        let cases = [
            (GoalInputs { years: 0.0, ..GoalInputs::default() }, "years"),
            (GoalInputs { target: f64::NAN, ..GoalInputs::default() }, "target"),
            (GoalInputs { inflation_rate: -1.5, ..GoalInputs::default() }, "inflation_rate"),
            (GoalInputs { current_savings: -1.0, ..GoalInputs::default() }, "current_savings"),
        ];
        for (inputs, name) in cases {
            let err = plan_goal(&inputs).unwrap_err();
            assert!(err.to_string().contains(name), "{err}");
        }
    }
}
