//! Correlation between two return series.

use super::returns::ReturnSeries;
use super::stats::pearson;
use crate::core::error::SeerError;
use crate::core::{Result, TimeSeries};

/// Rolling Pearson correlation over `window` common points.
///
/// The output is stamped with the common timestamps; windows where either
/// side has zero variance are NaN.
pub fn rolling_correlation(a: &ReturnSeries, b: &ReturnSeries, window: usize) -> Result<TimeSeries<f64>> {
    if window < 2 {
        return Err(SeerError::invalid_parameter("correlation window must be >= 2"));
    }
    let aligned = a.align(b);
    if aligned.len() < window {
        return Err(SeerError::insufficient_data("overlapping returns", window, aligned.len()));
    }

    let mut values = vec![f64::NAN; aligned.len()];
    for end in window..=aligned.len() {
        let range = end - window..end;
        values[end - 1] =
            pearson(&aligned.left[range.clone()], &aligned.right[range]).unwrap_or(f64::NAN);
    }
    Ok(TimeSeries::new(aligned.timestamps, values))
}

/// Pearson correlation over all common points.
pub fn overall_correlation(a: &ReturnSeries, b: &ReturnSeries) -> Result<f64> {
    let aligned = a.align(b);
    if aligned.len() < 2 {
        return Err(SeerError::insufficient_data("overlapping returns", 2, aligned.len()));
    }
    pearson(&aligned.left, &aligned.right)
        .ok_or_else(|| SeerError::division_by_zero("correlation (zero variance)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> ReturnSeries {
        TimeSeries::from_values(values.to_vec())
    }

    #[test]
    fn test_perfect_correlation() {
        let a = series(&[0.01, -0.02, 0.03, 0.01, -0.01]);
        let b = a.map(|v| v * 3.0);
        assert!((overall_correlation(&a, &b).unwrap() - 1.0).abs() < 1e-12);

        let rolling = rolling_correlation(&a, &b, 3).unwrap();
        assert_eq!(rolling.len(), 5);
        assert!(rolling.values[1].is_nan());
        assert!((rolling.values[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_little_overlap() {
        let a = series(&[0.01; 10]);
        let b = TimeSeries::new((5..15).collect(), vec![0.02; 10]);
        let err = rolling_correlation(&a, &b, 30).unwrap_err();
        assert!(err.to_string().contains("need 30 overlapping returns, have 5"));
    }

    #[test]
    fn test_zero_variance() {
        let a = series(&[0.01, 0.01, 0.01, 0.01]);
        let b = series(&[0.01, 0.02, 0.03, 0.04]);
        assert!(matches!(
            overall_correlation(&a, &b),
            Err(SeerError::DivisionByZero { .. })
        ));
        let rolling = rolling_correlation(&a, &b, 2).unwrap();
        assert!(rolling.values.iter().all(|v| v.is_nan()));
    }
}
