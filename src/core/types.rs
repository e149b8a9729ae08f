//! Core data types for stockseer.

use serde::{Deserialize, Serialize};

/// Type alias for price values.
pub type Price = f64;

/// Type alias for timestamp values (nanoseconds since epoch).
pub type Timestamp = i64;

/// Nanoseconds in one day.
pub const NANOS_PER_DAY: i64 = 86_400 * 1_000_000_000;

/// Days in an average calendar year, used for CAGR spans.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// OHLCV data for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All price and volume fields are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Why a bar sequence was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarDefect {
    /// Timestamp at `index` is not strictly greater than the previous one.
    NotIncreasing { index: usize },
    /// A price or volume at `index` is NaN or infinite.
    NonFinite { index: usize },
}

/// Check that bars are strictly time-ordered and numerically sane.
pub fn validate_bars(bars: &[Bar]) -> std::result::Result<(), BarDefect> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            return Err(BarDefect::NonFinite { index: i });
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(BarDefect::NotIncreasing { index: i });
        }
    }
    Ok(())
}

/// OHLCV data series (column layout).
#[derive(Debug, Clone, Default)]
pub struct OhlcvData {
    pub timestamps: Vec<Timestamp>,
    pub open: Vec<Price>,
    pub high: Vec<Price>,
    pub low: Vec<Price>,
    pub close: Vec<Price>,
    pub volume: Vec<f64>,
}

impl OhlcvData {
    /// Transpose a bar sequence into columns.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let n = bars.len();
        let mut data = Self {
            timestamps: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        };
        for bar in bars {
            data.timestamps.push(bar.timestamp);
            data.open.push(bar.open);
            data.high.push(bar.high);
            data.low.push(bar.low);
            data.close.push(bar.close);
            data.volume.push(bar.volume);
        }
        data
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn test_from_bars_columns() {
        let bars = vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)];
        let data = OhlcvData::from_bars(&bars);
        assert_eq!(data.len(), 3);
        assert_eq!(data.timestamps, vec![1, 2, 3]);
        assert_eq!(data.close, vec![10.0, 11.0, 12.0]);
        assert_eq!(data.high[2], 13.0);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let bars = vec![bar(1, 10.0), bar(1, 11.0)];
        assert_eq!(validate_bars(&bars), Err(BarDefect::NotIncreasing { index: 1 }));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let bars = vec![bar(1, 10.0), bar(2, f64::NAN)];
        assert_eq!(validate_bars(&bars), Err(BarDefect::NonFinite { index: 1 }));
    }
}
