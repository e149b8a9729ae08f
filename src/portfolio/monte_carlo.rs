//! Monte Carlo projection of a portfolio under periodic contributions.
//!
//! Each path compounds a normally distributed periodic return, adds the
//! contribution and optionally reinvests dividends. Paths run in parallel via
//! Rayon; every path owns a xoshiro256** stream obtained by jumping the base
//! generator, so a seeded run produces the same output on any thread count.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationLimits;
use crate::core::error::SeerError;
use crate::core::Result;
use crate::metrics::drawdown::DrawdownTracker;
use crate::metrics::stats::{percentile_sorted, RunningStats};

/// Percentiles reported for every period and for the final values.
pub const PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Trading days used by `simulate_market_path`.
const MARKET_DAYS_PER_YEAR: usize = 252;

/// Inputs of a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub initial_amount: f64,
    /// Added at the end of every period.
    pub periodic_contribution: f64,
    pub horizon_periods: usize,
    /// Annual expected return as a fraction.
    pub expected_return: f64,
    /// Annual volatility as a fraction.
    pub volatility: f64,
    /// Annual dividend yield as a fraction.
    pub dividend_yield: f64,
    pub reinvest_dividends: bool,
    /// Annual risk-free rate, used for the Sharpe ratio of outcomes.
    pub risk_free_rate: f64,
    pub path_count: usize,
    /// 12 for monthly steps, 252 for daily.
    pub periods_per_year: f64,
    /// Fixed seed for reproducible runs; `None` draws a fresh one.
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_amount: 10_000.0,
            periodic_contribution: 0.0,
            horizon_periods: 120,
            expected_return: 0.08,
            volatility: 0.15,
            dividend_yield: 0.0,
            reinvest_dividends: false,
            risk_free_rate: 0.03,
            path_count: 1_000,
            periods_per_year: 12.0,
            seed: None,
        }
    }
}

impl SimulationParams {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Net capital put in over the horizon: initial amount plus contributions,
    /// less withdrawals.
    pub fn total_invested(&self) -> f64 {
        self.initial_amount + self.periodic_contribution * self.horizon_periods as f64
    }

    /// Horizon in years.
    pub fn years(&self) -> f64 {
        self.horizon_periods as f64 / self.periods_per_year
    }

    /// Check every parameter against `limits` before any path is generated.
    pub fn validate(&self, limits: &SimulationLimits) -> Result<()> {
        self.validate_values()?;
        if self.path_count > limits.max_paths {
            return Err(SeerError::invalid_parameter(format!(
                "path_count {} exceeds the limit of {}",
                self.path_count, limits.max_paths
            )));
        }
        if self.horizon_periods > limits.max_horizon_periods {
            return Err(SeerError::invalid_parameter(format!(
                "horizon_periods {} exceeds the limit of {}",
                self.horizon_periods, limits.max_horizon_periods
            )));
        }
        let steps = self.path_count.checked_mul(self.horizon_periods + 1);
        if steps.map_or(true, |steps| steps > limits.max_path_steps) {
            return Err(SeerError::invalid_parameter(format!(
                "path_count {} x {} periods exceeds the limit of {} path values",
                self.path_count,
                self.horizon_periods + 1,
                limits.max_path_steps
            )));
        }
        Ok(())
    }

    fn validate_values(&self) -> Result<()> {
        fn check(ok: bool, name: &str, value: impl std::fmt::Display, rule: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(SeerError::invalid_parameter(format!("{name} must be {rule}, got {value}")))
            }
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        check(positive(self.initial_amount), "initial_amount", self.initial_amount, "positive")?;
        check(self.horizon_periods > 0, "horizon_periods", self.horizon_periods, "positive")?;
        check(self.path_count > 0, "path_count", self.path_count, "positive")?;
        check(positive(self.periods_per_year), "periods_per_year", self.periods_per_year, "positive")?;
        check(non_negative(self.volatility), "volatility", self.volatility, "non-negative")?;
        // negative contributions are withdrawals
        check(
            self.periodic_contribution.is_finite(),
            "periodic_contribution",
            self.periodic_contribution,
            "finite",
        )?;
        check(non_negative(self.dividend_yield), "dividend_yield", self.dividend_yield, "non-negative")?;
        check(self.expected_return.is_finite(), "expected_return", self.expected_return, "finite")?;
        check(self.risk_free_rate.is_finite(), "risk_free_rate", self.risk_free_rate, "finite")?;
        Ok(())
    }
}

/// One percentile tracked through every period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileSeries {
    pub percentile: f64,
    /// One value per period, starting with the initial amount.
    pub values: Vec<f64>,
}

/// A single percentile of the final values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantile {
    pub percentile: f64,
    pub value: f64,
}

/// Result of a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Every path, `horizon_periods + 1` values each.
    pub paths: Vec<Vec<f64>>,
    /// Final value of each path, in path order.
    pub final_values: Vec<f64>,
    pub percentiles: Vec<PercentileSeries>,
    pub final_percentiles: Vec<Quantile>,
    pub total_invested: f64,
    pub mean_final: f64,
    pub median_final: f64,
    /// Mean final value relative to the capital invested, in percent. When
    /// withdrawals leave no net capital the initial amount is the base for
    /// this and the loss figures below.
    pub expected_return_pct: f64,
    /// Share of paths ending below the capital invested.
    pub probability_of_loss: f64,
    /// Loss at the 5th percentile of final values, percent of invested capital.
    pub var_95: f64,
    /// Mean loss of the worst 5% of paths, percent of invested capital.
    pub cvar_95: f64,
    /// Mean of the per-path maximum drawdowns (fraction, <= 0).
    pub avg_max_drawdown: f64,
    /// Sharpe ratio of total outcome returns over the horizon.
    pub sharpe: f64,
    pub seed: u64,
}

impl SimulationOutput {
    /// Fraction of paths whose final value is at least `target`.
    pub fn success_probability(&self, target: f64) -> f64 {
        if self.final_values.is_empty() {
            return 0.0;
        }
        let hits = self.final_values.iter().filter(|&&v| v >= target).count();
        hits as f64 / self.final_values.len() as f64
    }

    /// Per-period values of one of the reported percentiles.
    pub fn percentile_path(&self, percentile: f64) -> Option<&[f64]> {
        self.percentiles
            .iter()
            .find(|p| p.percentile == percentile)
            .map(|p| p.values.as_slice())
    }

    fn from_paths(paths: Vec<Vec<f64>>, params: &SimulationParams, seed: u64) -> Self {
        let final_values: Vec<f64> = paths.iter().filter_map(|p| p.last().copied()).collect();
        let mut sorted = final_values.clone();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();

        let periods = params.horizon_periods + 1;
        let columns: Vec<Vec<f64>> = (0..periods)
            .into_par_iter()
            .map(|t| {
                let mut column: Vec<f64> = paths.iter().map(|p| p[t]).collect();
                column.sort_by(f64::total_cmp);
                PERCENTILES
                    .iter()
                    .map(|&q| percentile_sorted(&column, q).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        let percentiles = PERCENTILES
            .iter()
            .enumerate()
            .map(|(k, &percentile)| PercentileSeries {
                percentile,
                values: columns.iter().map(|row| row[k]).collect(),
            })
            .collect();
        let final_percentiles = PERCENTILES
            .iter()
            .map(|&percentile| Quantile {
                percentile,
                value: percentile_sorted(&sorted, percentile).unwrap_or(f64::NAN),
            })
            .collect();

        let invested = params.total_invested();
        // withdrawals can pull net capital to zero or below
        let basis = if invested > 0.0 { invested } else { params.initial_amount };
        let finals = RunningStats::from_slice(&sorted);
        let mean_final = finals.mean();
        let median_final = percentile_sorted(&sorted, 50.0).unwrap_or(f64::NAN);
        let losses = sorted.iter().filter(|&&v| v < basis).count();

        let loss_pct = |value: f64| ((basis - value) / basis * 100.0).max(0.0);
        let p5 = percentile_sorted(&sorted, 5.0).unwrap_or(f64::NAN);
        let tail = &sorted[..(((0.05 * n as f64).ceil() as usize).clamp(1, n))];
        let tail_mean = tail.iter().sum::<f64>() / tail.len() as f64;

        let drawdowns: Vec<f64> = paths
            .par_iter()
            .map(|path| {
                let mut tracker = DrawdownTracker::new();
                path.iter().for_each(|&v| {
                    tracker.update(v);
                });
                tracker.max_drawdown()
            })
            .collect();
        let avg_max_drawdown = drawdowns.iter().sum::<f64>() / n as f64;

        let hurdle = params.risk_free_rate * params.years();
        let excess = RunningStats::from_slice(
            &sorted.iter().map(|v| (v - basis) / basis - hurdle).collect::<Vec<_>>(),
        );
        let sharpe = match excess.variance_population() {
            Some(var) if var > 0.0 => excess.mean() / var.sqrt(),
            _ => 0.0,
        };

        Self {
            paths,
            final_values,
            percentiles,
            final_percentiles,
            total_invested: invested,
            mean_final,
            median_final,
            expected_return_pct: (mean_final / basis - 1.0) * 100.0,
            probability_of_loss: losses as f64 / n as f64,
            var_95: loss_pct(p5),
            cvar_95: loss_pct(tail_mean),
            avg_max_drawdown,
            sharpe,
            seed,
        }
    }
}

/// xoshiro256** generator with SplitMix64 seeding and the 2^128 jump.
#[derive(Debug, Clone)]
struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    fn new(seed: u64) -> Self {
        let mut z = seed;
        let mut s = [0u64; 4];
        for item in &mut s {
            z = z.wrapping_add(0x9e3779b97f4a7c15);
            let mut x = z;
            x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
            *item = x ^ (x >> 31);
        }
        Self { s }
    }

    /// Advance the state by 2^128 draws.
    fn jump(&mut self) {
        const JUMP: [u64; 4] =
            [0x180ec6d33cfd0aba, 0xd5a61266f0c9392c, 0xa9582618e03fc9aa, 0x39abdc4529b1661c];
        let mut acc = [0u64; 4];
        for word in JUMP {
            for bit in 0..64 {
                if word & (1u64 << bit) != 0 {
                    for (a, s) in acc.iter_mut().zip(self.s) {
                        *a ^= s;
                    }
                }
                self.next_u64();
            }
        }
        self.s = acc;
    }

    fn next_u64(&mut self) -> u64 {
        let result = self.s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Standard normal via Box-Muller.
    fn next_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// One independent stream per path, in path order.
fn path_streams(seed: u64, count: usize) -> Vec<Xoshiro256> {
    let mut base = Xoshiro256::new(seed);
    (0..count)
        .map(|_| {
            let stream = base.clone();
            base.jump();
            stream
        })
        .collect()
}

fn random_seed() -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos());
    hasher.write_u128(nanos);
    hasher.finish()
}

fn run_path(params: &SimulationParams, rng: &mut Xoshiro256) -> Vec<f64> {
    let drift = params.expected_return / params.periods_per_year;
    let sigma = params.volatility / params.periods_per_year.sqrt();
    let dividend = params.dividend_yield / params.periods_per_year;

    let mut value = params.initial_amount;
    let mut path = Vec::with_capacity(params.horizon_periods + 1);
    path.push(value);
    for _ in 0..params.horizon_periods {
        value *= 1.0 + drift + sigma * rng.next_normal();
        value += params.periodic_contribution;
        if params.reinvest_dividends {
            value *= 1.0 + dividend;
        }
        value = value.max(0.0);
        path.push(value);
    }
    path
}

/// Run the projection.
pub fn simulate(params: &SimulationParams, limits: &SimulationLimits) -> Result<SimulationOutput> {
    if let Err(err) = params.validate(limits) {
        tracing::warn!(error = %err, "rejecting simulation parameters");
        return Err(err);
    }

    let seed = params.seed.unwrap_or_else(random_seed);
    let started = Instant::now();
    tracing::debug!(
        paths = params.path_count,
        horizon = params.horizon_periods,
        seed,
        "starting monte carlo run"
    );

    let paths: Vec<Vec<f64>> = path_streams(seed, params.path_count)
        .into_par_iter()
        .map(|mut rng| run_path(params, &mut rng))
        .collect();
    let output = SimulationOutput::from_paths(paths, params, seed);

    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        median_final = output.median_final,
        "finished monte carlo run"
    );
    Ok(output)
}

/// The path every simulation would follow with zero volatility.
pub fn deterministic_projection(params: &SimulationParams) -> Result<Vec<f64>> {
    params.validate_values()?;
    let flat = SimulationParams { volatility: 0.0, ..params.clone() };
    // zero volatility cancels every draw
    Ok(run_path(&flat, &mut Xoshiro256::new(0)))
}

/// A single simulated daily price path over `years` (252 steps per year),
/// starting at `initial_value`.
pub fn simulate_market_path(
    initial_value: f64,
    years: usize,
    volatility: f64,
    growth_rate: f64,
    seed: Option<u64>,
) -> Result<Vec<f64>> {
    let params = SimulationParams {
        initial_amount: initial_value,
        horizon_periods: years * MARKET_DAYS_PER_YEAR,
        expected_return: growth_rate,
        volatility,
        path_count: 1,
        periods_per_year: MARKET_DAYS_PER_YEAR as f64,
        seed,
        ..SimulationParams::default()
    };
    params.validate(&SimulationLimits::default())?;
    let mut rng = Xoshiro256::new(seed.unwrap_or_else(random_seed));
    Ok(run_path(&params, &mut rng))
}
