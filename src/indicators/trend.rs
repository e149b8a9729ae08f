//! Trend indicators: SMA, EMA, CCI.

use super::rolling::{check_columns, check_period, windowed};
use crate::core::Result;

/// Lambert's constant scaling CCI into roughly +/-100.
const CCI_SCALE: f64 = 0.015;

/// Simple moving average over a trailing window.
///
/// Index `period - 1` holds the first value; earlier positions are NaN.
pub fn sma(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("SMA", period)?;

    let mut out = vec![f64::NAN; data.len()];
    if period > data.len() {
        return Ok(out);
    }

    // running sum, one add and one drop per step
    let mut running: f64 = data[..period].iter().sum();
    out[period - 1] = running / period as f64;
    for (i, (&incoming, &outgoing)) in data[period..].iter().zip(data).enumerate() {
        running += incoming - outgoing;
        out[period + i] = running / period as f64;
    }

    Ok(out)
}

/// Exponential moving average with `alpha = 2 / (period + 1)`.
///
/// The recursion starts from the SMA of the first `period` values, so the
/// warm-up matches `sma`.
pub fn ema(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("EMA", period)?;

    let mut out = vec![f64::NAN; data.len()];
    if period > data.len() {
        return Ok(out);
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut level = data[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = level;
    for (slot, &price) in out[period..].iter_mut().zip(&data[period..]) {
        level += alpha * (price - level);
        *slot = level;
    }

    Ok(out)
}

/// Commodity Channel Index on the typical price.
///
/// A window whose mean absolute deviation is zero reads 0.
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<f64>> {
    check_columns(close, &[high, low])?;
    check_period("CCI", period)?;

    let typical: Vec<f64> = close
        .iter()
        .zip(high.iter().zip(low))
        .map(|(c, (h, l))| (h + l + c) / 3.0)
        .collect();

    Ok(windowed(&typical, period, |w| {
        let len = w.len() as f64;
        let mean = w.iter().sum::<f64>() / len;
        let mad = w.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / len;
        match w.last() {
            Some(&last) if mad > 0.0 => (last - mean) / (CCI_SCALE * mad),
            _ => 0.0,
        }
    }))
}
