//! Window plumbing shared by every series indicator.
//!
//! All helpers produce an output as long as the input, with NaN at positions
//! whose trailing window is not complete yet.

use crate::core::error::SeerError;
use crate::core::Result;

/// Reject a zero lookback.
pub(crate) fn check_period(name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(SeerError::invalid_parameter(format!("{name} period must be > 0")));
    }
    Ok(())
}

/// Require every column to be as long as `close`.
pub(crate) fn check_columns(close: &[f64], others: &[&[f64]]) -> Result<()> {
    match others.iter().find(|col| col.len() != close.len()) {
        Some(col) => Err(SeerError::length_mismatch(close.len(), col.len())),
        None => Ok(()),
    }
}

/// Apply `f` to every complete trailing window of `period` values.
pub(crate) fn windowed<F>(data: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; data.len()];
    if period == 0 || period > data.len() {
        return out;
    }
    for (offset, window) in data.windows(period).enumerate() {
        out[offset + period - 1] = f(window);
    }
    out
}

/// Lowest value per window, skipping NaN entries.
pub fn rolling_min(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("rolling min", period)?;
    Ok(windowed(data, period, |w| {
        w.iter().copied().filter(|v| !v.is_nan()).reduce(f64::min).unwrap_or(f64::NAN)
    }))
}

/// Highest value per window, skipping NaN entries.
pub fn rolling_max(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("rolling max", period)?;
    Ok(windowed(data, period, |w| {
        w.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max).unwrap_or(f64::NAN)
    }))
}

/// Population standard deviation (ddof = 0) per window.
pub fn rolling_std(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("rolling std", period)?;
    Ok(windowed(data, period, |w| {
        let len = w.len() as f64;
        let mean = w.iter().sum::<f64>() / len;
        (w.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / len).sqrt()
    }))
}
