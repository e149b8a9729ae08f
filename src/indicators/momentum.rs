//! Momentum indicators: RSI, MACD, Stochastic, Williams %R.

use super::rolling::{check_columns, check_period, rolling_max, rolling_min, windowed};
use super::trend::ema;
use crate::core::error::SeerError;
use crate::core::Result;

/// Relative Strength Index with Wilder smoothing.
///
/// The first bar counts as a zero move, so the first value sits at index
/// `period - 1`. Both averages start as simple means of the first `period`
/// moves. An average loss of zero saturates at 100.
pub fn rsi(data: &[f64], period: usize) -> Result<Vec<f64>> {
    check_period("RSI", period)?;

    let mut out = vec![f64::NAN; data.len()];
    if period > data.len() {
        return Ok(out);
    }

    // (gain, loss) per bar
    let moves: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain(data.windows(2).map(|pair| {
            let change = pair[1] - pair[0];
            (change.max(0.0), (-change).max(0.0))
        }))
        .collect();

    let len = period as f64;
    let (mut avg_gain, mut avg_loss) = moves[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &(gain, loss)| (g + gain / len, l + loss / len));
    out[period - 1] = strength_index(avg_gain, avg_loss);

    for (i, &(gain, loss)) in moves.iter().enumerate().skip(period) {
        avg_gain += (gain - avg_gain) / len;
        avg_loss += (loss - avg_loss) / len;
        out[i] = strength_index(avg_gain, avg_loss);
    }

    Ok(out)
}

/// `100 - 100 / (1 + up / down)`, saturating when nothing went down.
#[inline]
pub(crate) fn strength_index(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + up / down)
    }
}

/// MACD line, signal and histogram, each as long as the input.
#[derive(Debug, Clone)]
pub struct MacdResult {
    /// Fast EMA minus slow EMA.
    pub macd_line: Vec<f64>,
    /// EMA of the line, seeded by the SMA of its first `signal` values.
    pub signal_line: Vec<f64>,
    /// Line minus signal.
    pub histogram: Vec<f64>,
}

/// Moving Average Convergence Divergence.
///
/// The line starts at index `slow - 1`; signal and histogram at
/// `slow + signal - 2`. With 12/26/9 that is index 33, the 34th bar.
pub fn macd(data: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdResult> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Err(SeerError::invalid_parameter("MACD periods must be > 0"));
    }
    if fast >= slow {
        return Err(SeerError::invalid_parameter(format!(
            "MACD fast period ({fast}) must be < slow period ({slow})"
        )));
    }

    let n = data.len();
    let mut result = MacdResult {
        macd_line: vec![f64::NAN; n],
        signal_line: vec![f64::NAN; n],
        histogram: vec![f64::NAN; n],
    };
    if slow > n {
        return Ok(result);
    }

    let fast_ema = ema(data, fast)?;
    let slow_ema = ema(data, slow)?;
    for i in slow - 1..n {
        result.macd_line[i] = fast_ema[i] - slow_ema[i];
    }

    // the EMA of the defined tail of the line, shifted back into place
    let smoothed = ema(&result.macd_line[slow - 1..], signal)?;
    for (offset, value) in smoothed.into_iter().enumerate() {
        let i = slow - 1 + offset;
        if !value.is_nan() {
            result.signal_line[i] = value;
            result.histogram[i] = result.macd_line[i] - value;
        }
    }

    Ok(result)
}

/// %K and %D lines of the stochastic oscillator.
#[derive(Debug, Clone)]
pub struct StochasticResult {
    pub k: Vec<f64>,
    /// SMA of %K over `d_period`.
    pub d: Vec<f64>,
}

/// Stochastic oscillator on a 0-100 scale.
///
/// %K is the close's position inside the trailing `k_period` high/low range
/// (50 for a zero-width range). %D averages the last `d_period` %K values.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> Result<StochasticResult> {
    check_columns(close, &[high, low])?;
    check_period("Stochastic %K", k_period)?;
    check_period("Stochastic %D", d_period)?;

    let highest = rolling_max(high, k_period)?;
    let lowest = rolling_min(low, k_period)?;

    let k: Vec<f64> = close
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&c, (&hh, &ll))| match hh - ll {
            range if range.is_nan() => f64::NAN,
            range if range > 0.0 => (c - ll) / range * 100.0,
            _ => 50.0,
        })
        .collect();

    // NaN anywhere in a window keeps %D undefined until %K has d_period values
    let d = windowed(&k, d_period, |w| w.iter().sum::<f64>() / w.len() as f64);

    Ok(StochasticResult { k, d })
}

/// Williams %R: distance of the close below the trailing high, -100..0.
pub fn williams_r(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<f64>> {
    check_columns(close, &[high, low])?;
    check_period("Williams %R", period)?;

    let highest = rolling_max(high, period)?;
    let lowest = rolling_min(low, period)?;

    Ok(close
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&c, (&hh, &ll))| match hh - ll {
            range if range.is_nan() => f64::NAN,
            range if range > 0.0 => -100.0 * (hh - c) / range,
            _ => -50.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup_and_range() {
        let data = vec![
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.0, 44.0, 44.25, 45.0, 45.5, 46.0, 46.5,
            47.0, 47.5,
        ];
        let result = rsi(&data, 14).unwrap();
        assert!(result[12].is_nan());
        assert!(result[13] > 0.0 && result[13] < 100.0);
        assert!(result[14] > 0.0 && result[14] < 100.0);
    }

    #[test]
    fn test_rsi_first_value_averages_leading_zero_move() {
        // 13 changes: ten gains of 1, three losses of 1, plus the zero move
        let mut data: Vec<f64> = (0..11).map(|x| x as f64).collect();
        data.extend([9.0, 8.0, 7.0]);
        let result = rsi(&data, 14).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 10.0 / 3.0);
        assert!((result[13] - expected).abs() < 1e-12);
        assert!(rsi(&data[..13], 14).unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rsi_saturates_without_losses() {
        let data: Vec<f64> = (0..20).map(|x| x as f64).collect();
        let result = rsi(&data, 14).unwrap();
        assert_eq!(result[13], 100.0);
        assert_eq!(result[19], 100.0);
    }

    #[test]
    fn test_rsi_falling_is_zero() {
        let data: Vec<f64> = (0..20).map(|x| 100.0 - x as f64).collect();
        assert_eq!(rsi(&data, 14).unwrap()[14], 0.0);
    }

    #[test]
    fn test_macd_warmup() {
        let data: Vec<f64> = (1..=50).map(|x| (x as f64 * 0.3).sin() + x as f64).collect();
        let result = macd(&data, 12, 26, 9).unwrap();

        assert!(result.macd_line[24].is_nan());
        assert!(!result.macd_line[25].is_nan());
        assert!(result.signal_line[32].is_nan());
        assert!(!result.signal_line[33].is_nan());
        assert!(result.histogram[32].is_nan());
        assert_eq!(result.histogram[40], result.macd_line[40] - result.signal_line[40]);
    }

    #[test]
    fn test_macd_signal_seed_is_line_average() {
        let data: Vec<f64> = (0..40).map(|x| (x as f64 * 0.5).cos() * 3.0 + 50.0).collect();
        let result = macd(&data, 12, 26, 9).unwrap();
        let seed = result.macd_line[25..34].iter().sum::<f64>() / 9.0;
        assert!((result.signal_line[33] - seed).abs() < 1e-12);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        let err = macd(&[1.0; 40], 26, 12, 9).unwrap_err();
        assert!(err.to_string().contains("must be < slow"));
    }

    #[test]
    fn test_stochastic() {
        let high = vec![50.0, 51.0, 52.0, 51.5, 50.5, 51.0, 52.0, 53.0, 52.5, 51.5];
        let low = vec![48.0, 49.0, 50.0, 49.5, 48.5, 49.0, 50.0, 51.0, 50.5, 49.5];
        let close = vec![49.0, 50.0, 51.0, 50.0, 49.0, 50.0, 51.0, 52.0, 51.0, 50.0];

        let result = stochastic(&high, &low, &close, 5, 3).unwrap();

        assert!(result.k[3].is_nan());
        assert!((0.0..=100.0).contains(&result.k[4]));
        assert!(result.d[5].is_nan());
        let mean = (result.k[4] + result.k[5] + result.k[6]) / 3.0;
        assert!((result.d[6] - mean).abs() < 1e-12);
    }

    #[test]
    fn test_stochastic_flat_range() {
        let flat = vec![10.0; 6];
        let result = stochastic(&flat, &flat, &flat, 3, 2).unwrap();
        assert_eq!(result.k[5], 50.0);
    }

    #[test]
    fn test_williams_r_bounds() {
        let high = vec![11.0, 12.0, 13.0, 14.0];
        let low = vec![9.0, 10.0, 11.0, 12.0];
        let close = vec![10.0, 12.0, 11.0, 14.0];
        let result = williams_r(&high, &low, &close, 3).unwrap();
        assert!(result[1].is_nan());
        // close at the top of the range
        assert!(result[3].abs() < 1e-10);
        assert!((-100.0..=0.0).contains(&result[2]));
    }
}
