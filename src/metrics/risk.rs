//! Volatility, risk-adjusted return ratios and beta, plus the `RiskMetrics`
//! record that gathers them for one instrument.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::drawdown::{max_drawdown, MaxDrawdown};
use super::performance::{calmar, cagr_with_min_years};
use super::returns::{returns_from_bars, ReturnSeries};
use super::stats::{covariance, mean, sample_std, RunningStats};
use crate::core::config::RiskConfig;
use crate::core::error::SeerError;
use crate::core::types::Bar;
use crate::core::Result;

fn finite(returns: &[f64]) -> Vec<f64> {
    returns.iter().copied().filter(|r| !r.is_nan()).collect()
}

/// Annualized volatility (percent) of the trailing `window` returns.
///
/// Sample standard deviation scaled by `sqrt(periods_per_year) * 100`.
pub fn volatility(returns: &[f64], window: usize, periods_per_year: f64) -> Result<f64> {
    if window < 2 {
        return Err(SeerError::invalid_parameter("volatility window must be >= 2"));
    }
    let returns = finite(returns);
    if returns.len() < window {
        return Err(SeerError::insufficient_data("returns", window, returns.len()));
    }
    let tail = &returns[returns.len() - window..];
    let std = sample_std(tail).ok_or_else(|| SeerError::insufficient_data("returns", 2, tail.len()))?;
    Ok(std * periods_per_year.sqrt() * 100.0)
}

/// Rolling annualized volatility (percent); NaN until `window` returns exist.
pub fn historical_volatility(returns: &[f64], window: usize, periods_per_year: f64) -> Result<Vec<f64>> {
    if window < 2 {
        return Err(SeerError::invalid_parameter("volatility window must be >= 2"));
    }
    let scale = periods_per_year.sqrt() * 100.0;
    let mut result = vec![f64::NAN; returns.len()];
    if window > returns.len() {
        return Ok(result);
    }
    for i in (window - 1)..returns.len() {
        let std = RunningStats::from_slice(&returns[i + 1 - window..=i]).std_dev();
        result[i] = std.map_or(f64::NAN, |s| s * scale);
    }
    Ok(result)
}

/// Volatility bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Bucket an annualized volatility percentage.
    pub fn from_volatility(volatility_pct: f64) -> Self {
        if volatility_pct < 15.0 {
            RiskLevel::Low
        } else if volatility_pct < 30.0 {
            RiskLevel::Moderate
        } else if volatility_pct < 50.0 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low price swings.",
            RiskLevel::Moderate => "Moderate price swings.",
            RiskLevel::High => "Significant price swings.",
            RiskLevel::VeryHigh => "Extreme price swings.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        })
    }
}

/// Annualized Sharpe ratio of periodic returns.
///
/// Zero when the excess returns have no dispersion.
pub fn sharpe(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> Result<f64> {
    let returns = finite(returns);
    if returns.len() < 2 {
        return Err(SeerError::insufficient_data("returns", 2, returns.len()));
    }
    let per_period = risk_free_rate / periods_per_year;
    let stats = RunningStats::from_slice(&returns.iter().map(|r| r - per_period).collect::<Vec<_>>());
    match stats.std_dev() {
        Some(std) if std > 0.0 => Ok(stats.mean() / std * periods_per_year.sqrt()),
        _ => Ok(0.0),
    }
}

/// Annualized Sortino ratio against the per-period risk-free target.
///
/// Zero when fewer than two returns fall below the target or their
/// deviation is zero.
pub fn sortino(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> Result<f64> {
    let returns = finite(returns);
    if returns.len() < 2 {
        return Err(SeerError::insufficient_data("returns", 2, returns.len()));
    }
    let target = risk_free_rate / periods_per_year;
    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < target).collect();
    let expected = mean(&returns).unwrap_or(0.0);
    match sample_std(&downside) {
        Some(std) if std > 0.0 => Ok((expected - target) / std * periods_per_year.sqrt()),
        _ => Ok(0.0),
    }
}

/// Beta of `stock` against `index`, over their common timestamps.
pub fn beta(stock: &ReturnSeries, index: &ReturnSeries) -> Result<f64> {
    let aligned = stock.align(index);
    if aligned.len() < 2 {
        return Err(SeerError::insufficient_data("overlapping returns", 2, aligned.len()));
    }
    let variance = RunningStats::from_slice(&aligned.right).variance().unwrap_or(0.0);
    if variance == 0.0 {
        return Err(SeerError::division_by_zero("beta (benchmark returns have zero variance)"));
    }
    let cov = covariance(&aligned.left, &aligned.right)
        .ok_or_else(|| SeerError::insufficient_data("overlapping returns", 2, aligned.len()))?;
    Ok(cov / variance)
}

/// Risk summary for one instrument; every `None` has a matching note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub volatility_pct: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub calmar: Option<f64>,
    pub max_drawdown: Option<MaxDrawdown>,
    pub beta_vs_benchmark: Option<f64>,
    pub cagr_pct: Option<f64>,
    pub notes: Vec<String>,
}

impl RiskMetrics {
    fn record<T>(&mut self, metric: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.notes.push(format!("{metric}: {err}"));
                None
            }
        }
    }
}

/// Compute every risk metric for `bars`, and beta when a benchmark is given.
///
/// Individual failures never abort the record; they are reported in `notes`.
pub fn risk_metrics(bars: &[Bar], benchmark: Option<&[Bar]>, config: &RiskConfig) -> RiskMetrics {
    let mut metrics = RiskMetrics::default();
    let ppy = config.periods_per_year;

    let returns = metrics.record("returns", returns_from_bars(bars));
    let values = returns.as_ref().map(|r| r.values.clone()).unwrap_or_default();

    metrics.volatility_pct =
        metrics.record("volatility", volatility(&values, config.volatility_window, ppy));
    metrics.risk_level = metrics.volatility_pct.map(RiskLevel::from_volatility);
    metrics.sharpe = metrics.record("sharpe", sharpe(&values, config.risk_free_rate, ppy));
    metrics.sortino = metrics.record("sortino", sortino(&values, config.risk_free_rate, ppy));

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    metrics.max_drawdown = metrics.record("max drawdown", max_drawdown(&closes));
    metrics.cagr_pct = metrics.record("cagr", cagr_with_min_years(bars, config.min_cagr_years));
    metrics.calmar = metrics.record(
        "calmar",
        calmar(metrics.cagr_pct, metrics.max_drawdown.map(|dd| dd.value)),
    );

    if let Some(benchmark) = benchmark {
        let beta_value = match (&returns, returns_from_bars(benchmark)) {
            (Some(stock), Ok(index)) => beta(stock, &index),
            (_, Err(err)) => Err(err),
            (None, Ok(_)) => Err(SeerError::insufficient_data("bars", 2, bars.len())),
        };
        metrics.beta_vs_benchmark = metrics.record("beta", beta_value);
    }

    tracing::debug!(
        bars = bars.len(),
        notes = metrics.notes.len(),
        volatility_pct = ?metrics.volatility_pct,
        "computed risk metrics"
    );
    metrics
}
