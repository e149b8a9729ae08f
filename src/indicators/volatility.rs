//! Volatility indicators: ATR, Bollinger Bands.

use super::rolling::{check_columns, check_period, rolling_std};
use super::trend::sma;
use crate::core::error::SeerError;
use crate::core::Result;

/// Largest of the bar range and the gaps from the previous close.
#[inline]
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Average True Range with Wilder smoothing.
///
/// The first bar has no previous close, so its true range is `high - low`.
/// The average is seeded with the mean of the first `period` ranges.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<f64>> {
    check_columns(close, &[high, low])?;
    check_period("ATR", period)?;

    let n = close.len();
    let mut out = vec![f64::NAN; n];
    if period > n {
        return Ok(out);
    }

    let ranges: Vec<f64> = (0..n)
        .map(|i| match i {
            0 => high[0] - low[0],
            _ => true_range(high[i], low[i], close[i - 1]),
        })
        .collect();

    let len = period as f64;
    let mut average = ranges[..period].iter().sum::<f64>() / len;
    out[period - 1] = average;
    for i in period..n {
        average += (ranges[i] - average) / len;
        out[i] = average;
    }

    Ok(out)
}

/// Bollinger Band columns.
#[derive(Debug, Clone)]
pub struct BollingerBandsResult {
    /// SMA of the price.
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    /// `(upper - lower) / middle`
    pub bandwidth: Vec<f64>,
    /// `(price - lower) / (upper - lower)`, NaN inside a zero-width band
    pub percent_b: Vec<f64>,
}

/// Bollinger Bands: SMA plus/minus `multiplier` population standard deviations.
pub fn bollinger_bands(data: &[f64], period: usize, multiplier: f64) -> Result<BollingerBandsResult> {
    check_period("Bollinger Bands", period)?;
    if !(multiplier > 0.0) {
        return Err(SeerError::invalid_parameter(format!(
            "Bollinger Bands multiplier must be > 0, got {multiplier}"
        )));
    }

    let middle = sma(data, period)?;
    let spread = rolling_std(data, period)?;

    let n = data.len();
    let mut bands = BollingerBandsResult {
        middle: Vec::new(),
        upper: vec![f64::NAN; n],
        lower: vec![f64::NAN; n],
        bandwidth: vec![f64::NAN; n],
        percent_b: vec![f64::NAN; n],
    };

    for (i, (&mid, &sd)) in middle.iter().zip(&spread).enumerate() {
        if mid.is_nan() {
            continue;
        }
        let (upper, lower) = (mid + multiplier * sd, mid - multiplier * sd);
        bands.upper[i] = upper;
        bands.lower[i] = lower;

        let width = upper - lower;
        if mid.abs() > f64::EPSILON {
            bands.bandwidth[i] = width / mid.abs();
        }
        if width > f64::EPSILON {
            bands.percent_b[i] = (data[i] - lower) / width;
        }
    }
    bands.middle = middle;

    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atr_seed_and_smoothing() {
        let high = vec![50.0, 51.0, 52.0, 51.5, 50.5, 51.0];
        let low = vec![48.0, 49.0, 50.0, 49.5, 48.5, 49.0];
        let close = vec![49.0, 50.0, 51.0, 50.0, 49.0, 50.0];

        let result = atr(&high, &low, &close, 5).unwrap();

        assert!(result[3].is_nan());
        // every true range here is 2.0
        assert!((result[4] - 2.0).abs() < 1e-12);
        assert!((result[5] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_length_mismatch() {
        assert!(atr(&[1.0], &[1.0, 2.0], &[1.0, 2.0], 1).is_err());
    }

    #[test]
    fn test_bollinger_bands_order() {
        let data: Vec<f64> = (1..=30)
            .map(|x| x as f64 + (x as f64 * 0.1).sin())
            .collect();

        let result = bollinger_bands(&data, 20, 2.0).unwrap();

        assert!(result.middle[18].is_nan());
        assert!(result.upper[18].is_nan());
        assert!(result.upper[19] > result.middle[19]);
        assert!(result.middle[19] > result.lower[19]);
        assert!((0.0..=1.0).contains(&result.percent_b[25]));
    }

    #[test]
    fn test_bollinger_flat_series() {
        let data = vec![100.0; 25];
        let result = bollinger_bands(&data, 20, 2.0).unwrap();
        assert_eq!(result.upper[24], 100.0);
        assert_eq!(result.lower[24], 100.0);
        assert_eq!(result.bandwidth[24], 0.0);
        assert!(result.percent_b[24].is_nan());
    }

    #[test]
    fn test_bollinger_rejects_bad_multiplier() {
        assert!(bollinger_bands(&[1.0, 2.0], 2, 0.0).is_err());
        assert!(bollinger_bands(&[1.0, 2.0], 2, f64::NAN).is_err());
    }

    #[test]
    fn test_true_range() {
        assert!((true_range(52.0, 48.0, 50.0) - 4.0).abs() < 1e-10);
        // gap up
        assert!((true_range(55.0, 53.0, 50.0) - 5.0).abs() < 1e-10);
        // gap down
        assert!((true_range(48.0, 45.0, 50.0) - 5.0).abs() < 1e-10);
    }
}
