//! Growth and return-distribution metrics: CAGR, Calmar, historical
//! performance of an initial investment and the advanced metrics table.

use serde::{Deserialize, Serialize};

use super::drawdown::{max_drawdown, MaxDrawdown};
use super::returns::{returns_from_bars, total_return};
use super::risk::{sharpe, sortino};
use super::stats::{excess_kurtosis, percentile, sample_std, skewness};
use crate::core::error::SeerError;
use crate::core::types::{Bar, DAYS_PER_YEAR, NANOS_PER_DAY};
use crate::core::Result;

/// Shortest span for which a CAGR is reported.
pub const MIN_CAGR_YEARS: f64 = 0.1;

/// Span between the first and last bar in years (whole days / 365.25).
pub fn span_years(bars: &[Bar]) -> Option<f64> {
    let (first, last) = (bars.first()?, bars.last()?);
    let days = (last.timestamp - first.timestamp) / NANOS_PER_DAY;
    Some(days as f64 / DAYS_PER_YEAR)
}

/// Compound annual growth rate of the close, in percent.
pub fn cagr(bars: &[Bar]) -> Result<f64> {
    cagr_with_min_years(bars, MIN_CAGR_YEARS)
}

/// CAGR with a custom minimum span.
pub fn cagr_with_min_years(bars: &[Bar], min_years: f64) -> Result<f64> {
    let (first, last) = match bars {
        [first, .., last] => (first, last),
        _ => return Err(SeerError::insufficient_data("bars", 2, bars.len())),
    };
    let years = span_years(bars).unwrap_or(0.0);
    if years < min_years {
        return Err(SeerError::not_computable(format!(
            "period too short for CAGR ({years:.2} years, need {min_years})"
        )));
    }
    if first.close <= 0.0 {
        return Err(SeerError::division_by_zero("CAGR (non-positive start price)"));
    }
    let multiple = last.close / first.close;
    if multiple <= 0.0 {
        return Err(SeerError::not_computable("CAGR undefined for a non-positive end price"));
    }
    Ok((multiple.powf(1.0 / years) - 1.0) * 100.0)
}

/// Calmar ratio: CAGR percent over the absolute max drawdown fraction.
pub fn calmar(cagr_pct: Option<f64>, max_drawdown: Option<f64>) -> Result<f64> {
    match (cagr_pct, max_drawdown) {
        (Some(_), Some(dd)) if dd == 0.0 => {
            Err(SeerError::not_computable("Calmar undefined without a drawdown"))
        }
        (Some(cagr), Some(dd)) => Ok(cagr / dd.abs()),
        (None, _) => Err(SeerError::not_computable("Calmar needs a CAGR")),
        (_, None) => Err(SeerError::not_computable("Calmar needs a max drawdown")),
    }
}

/// What an initial investment at the first close would be worth at the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPerformance {
    pub initial_investment: f64,
    pub final_value: f64,
    pub cagr_pct: Option<f64>,
    /// Why `cagr_pct` is missing, if it is.
    pub note: Option<String>,
}

/// Historical growth of `initial_investment` over the bar span.
pub fn historical_performance(bars: &[Bar], initial_investment: f64) -> Result<HistoricalPerformance> {
    let (first, last) = match bars {
        [first, .., last] => (first, last),
        _ => return Err(SeerError::insufficient_data("bars", 2, bars.len())),
    };
    let multiple = if first.close != 0.0 { last.close / first.close } else { 1.0 };
    let (cagr_pct, note) = match cagr(bars) {
        Ok(value) => (Some(value), None),
        Err(err) => (None, Some(err.to_string())),
    };
    Ok(HistoricalPerformance {
        initial_investment,
        final_value: initial_investment * multiple,
        cagr_pct,
        note,
    })
}

/// Compound `initial` at `cagr_pct` for `years`.
pub fn project_future_value(initial: f64, cagr_pct: f64, years: f64) -> Result<f64> {
    if !initial.is_finite() || !cagr_pct.is_finite() || !years.is_finite() || years < 0.0 {
        return Err(SeerError::invalid_parameter(format!(
            "projection needs finite inputs and years >= 0 (initial={initial}, cagr={cagr_pct}, years={years})"
        )));
    }
    Ok(initial * (1.0 + cagr_pct / 100.0).powf(years))
}

/// Return-distribution summary of a bar sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// Fractional return over the whole span.
    pub total_return: f64,
    /// `(1 + total_return)^(ppy / n_returns) - 1`.
    pub annualized_return: f64,
    /// Annualized standard deviation of returns (fraction).
    pub annualized_volatility: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: MaxDrawdown,
    /// 5th percentile of periodic returns.
    pub var_95: f64,
    /// Annualized return over |max drawdown|; `None` without a drawdown.
    pub calmar: Option<f64>,
    pub skewness: Option<f64>,
    pub excess_kurtosis: Option<f64>,
}

/// Compute the advanced metrics table.
pub fn advanced_metrics(bars: &[Bar], risk_free_rate: f64, periods_per_year: f64) -> Result<AdvancedMetrics> {
    let returns = returns_from_bars(bars)?.dropna().values;
    if returns.len() < 2 {
        return Err(SeerError::insufficient_data("returns", 2, returns.len()));
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let total = total_return(&closes)?;
    let annualized_return = (1.0 + total).powf(periods_per_year / returns.len() as f64) - 1.0;
    let annualized_volatility = sample_std(&returns).unwrap_or(0.0) * periods_per_year.sqrt();
    let drawdown = max_drawdown(&closes)?;

    Ok(AdvancedMetrics {
        total_return: total,
        annualized_return,
        annualized_volatility,
        sharpe: sharpe(&returns, risk_free_rate, periods_per_year)?,
        sortino: sortino(&returns, risk_free_rate, periods_per_year)?,
        max_drawdown: drawdown,
        var_95: percentile(&returns, 5.0).unwrap_or(f64::NAN),
        calmar: (drawdown.value != 0.0).then(|| annualized_return / drawdown.value.abs()),
        skewness: skewness(&returns),
        excess_kurtosis: excess_kurtosis(&returns),
    })
}
