//! Periodic return series.

use crate::core::error::SeerError;
use crate::core::types::Bar;
use crate::core::{Result, TimeSeries};

/// Fractional returns stamped with the later bar's timestamp.
pub type ReturnSeries = TimeSeries<f64>;

/// Simple returns `p[t] / p[t-1] - 1`; one shorter than the input.
///
/// A zero previous price yields NaN for that step rather than infinity.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| if w[0] == 0.0 { f64::NAN } else { w[1] / w[0] - 1.0 })
        .collect()
}

/// Close-to-close returns of a bar sequence.
pub fn returns_from_bars(bars: &[Bar]) -> Result<ReturnSeries> {
    if bars.len() < 2 {
        return Err(SeerError::insufficient_data("bars", 2, bars.len()));
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let timestamps = bars[1..].iter().map(|b| b.timestamp).collect();
    Ok(TimeSeries::new(timestamps, simple_returns(&closes)))
}

/// Total return of a price path, as a fraction.
pub fn total_return(prices: &[f64]) -> Result<f64> {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 => {
            if first == 0.0 {
                return Err(SeerError::division_by_zero("total return (zero start price)"));
            }
            Ok(last / first - 1.0)
        }
        _ => Err(SeerError::insufficient_data("prices", 2, prices.len())),
    }
}
