//! Drawdown from the running peak.

use serde::{Deserialize, Serialize};

use crate::core::error::SeerError;
use crate::core::Result;

/// Largest peak-to-trough decline of a price path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxDrawdown {
    /// Fractional decline, always <= 0.
    pub value: f64,
    /// Index of the peak preceding the trough.
    pub start_index: usize,
    /// Index of the trough (first global minimum of the drawdown curve).
    pub end_index: usize,
}

impl MaxDrawdown {
    /// Decline as a percentage (<= 0).
    #[inline]
    pub fn pct(&self) -> f64 {
        self.value * 100.0
    }
}

/// Incremental drawdown tracker.
///
/// Feed values in order; the tracker keeps the running peak and the deepest
/// drawdown seen so far together with its peak and trough indices.
#[derive(Debug, Clone, Default)]
pub struct DrawdownTracker {
    count: usize,
    peak: f64,
    peak_idx: usize,
    current: f64,
    max_drawdown: f64,
    start_idx: usize,
    trough_idx: usize,
}

impl DrawdownTracker {
    /// Create a new drawdown tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next value and return the current drawdown fraction.
    pub fn update(&mut self, value: f64) -> f64 {
        let idx = self.count;
        self.count += 1;

        // ties move the peak forward so the start is the latest high
        if idx == 0 || value >= self.peak {
            self.peak = value;
            self.peak_idx = idx;
        }

        self.current = if self.peak > 0.0 { value / self.peak - 1.0 } else { 0.0 };
        if self.current < self.max_drawdown {
            self.max_drawdown = self.current;
            self.start_idx = self.peak_idx;
            self.trough_idx = idx;
        }
        self.current
    }

    /// Current drawdown fraction (<= 0).
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Deepest drawdown fraction so far (<= 0).
    #[inline]
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    /// Current running peak.
    #[inline]
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Number of values seen.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Snapshot of the deepest drawdown.
    pub fn summary(&self) -> MaxDrawdown {
        MaxDrawdown {
            value: self.max_drawdown,
            start_index: self.start_idx,
            end_index: self.trough_idx,
        }
    }
}

fn check_prices(prices: &[f64]) -> Result<()> {
    if prices.len() < 2 {
        return Err(SeerError::insufficient_data("prices", 2, prices.len()));
    }
    if let Some(i) = prices.iter().position(|p| !p.is_finite() || *p <= 0.0) {
        return Err(SeerError::invalid_parameter(format!(
            "price at index {i} must be positive and finite, got {}",
            prices[i]
        )));
    }
    Ok(())
}

/// Maximum drawdown of a price path.
///
/// Needs at least two strictly positive prices.
pub fn max_drawdown(prices: &[f64]) -> Result<MaxDrawdown> {
    check_prices(prices)?;
    let mut tracker = DrawdownTracker::new();
    prices.iter().for_each(|&p| {
        tracker.update(p);
    });
    Ok(tracker.summary())
}

/// Per-bar drawdown `price / running_max - 1`.
pub fn drawdown_curve(prices: &[f64]) -> Result<Vec<f64>> {
    check_prices(prices)?;
    let mut tracker = DrawdownTracker::new();
    Ok(prices.iter().map(|&p| tracker.update(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_drawdown_indices() {
        let prices = [100.0, 120.0, 90.0, 110.0, 60.0, 130.0];
        let dd = max_drawdown(&prices).unwrap();
        assert!((dd.value - (-0.5)).abs() < 1e-12);
        assert_eq!(dd.start_index, 1);
        assert_eq!(dd.end_index, 4);
        assert!((dd.pct() + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_rise_has_no_drawdown() {
        let dd = max_drawdown(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(dd.value, 0.0);
        assert_eq!((dd.start_index, dd.end_index), (0, 0));
    }

    #[test]
    fn test_repeated_peak_uses_latest() {
        let dd = max_drawdown(&[10.0, 8.0, 10.0, 5.0, 5.0]).unwrap();
        assert_eq!(dd.start_index, 2);
        // first occurrence of the trough
        assert_eq!(dd.end_index, 3);
    }

    #[test]
    fn test_curve_and_validation() {
        let curve = drawdown_curve(&[100.0, 50.0, 100.0]).unwrap();
        assert_eq!(curve, vec![0.0, -0.5, 0.0]);
        assert!(max_drawdown(&[1.0]).unwrap_err().is_insufficient_data());
        assert!(matches!(
            max_drawdown(&[1.0, 0.0]),
            Err(SeerError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_tracker_floors_at_zero_value() {
        let mut tracker = DrawdownTracker::new();
        tracker.update(100.0);
        assert_eq!(tracker.update(0.0), -1.0);
        assert_eq!(tracker.max_drawdown(), -1.0);
    }
}
