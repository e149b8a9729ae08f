//! Time-indexed array wrapper used for return series and rolling outputs.

use serde::{Deserialize, Serialize};

use super::types::Timestamp;

/// A time-indexed series of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    /// Timestamps for each value.
    pub timestamps: Vec<Timestamp>,
    /// Values.
    pub values: Vec<T>,
}

/// Two series restricted to their common timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub timestamps: Vec<Timestamp>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl Aligned {
    /// Number of overlapping points.
    #[inline]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if there is no overlap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Create a new time series.
    pub fn new(timestamps: Vec<Timestamp>, values: Vec<T>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self { timestamps, values }
    }

    /// Create from values only (timestamps are the positions).
    pub fn from_values(values: Vec<T>) -> Self {
        let timestamps = (0..values.len() as i64).collect();
        Self { timestamps, values }
    }

    /// Get the length.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get value at index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Last value, if any.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// Map values to a new type.
    pub fn map<U, F>(&self, f: F) -> TimeSeries<U>
    where
        F: Fn(&T) -> U,
    {
        TimeSeries {
            timestamps: self.timestamps.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Iterator over (timestamp, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &T)> {
        self.timestamps.iter().copied().zip(self.values.iter())
    }
}

impl TimeSeries<f64> {
    /// Inner join on timestamps, dropping NaN on either side.
    ///
    /// Both series must have ascending timestamps.
    pub fn align(&self, other: &Self) -> Aligned {
        let mut out = Aligned {
            timestamps: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
        };
        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            let (ta, tb) = (self.timestamps[i], other.timestamps[j]);
            if ta < tb {
                i += 1;
            } else if tb < ta {
                j += 1;
            } else {
                let (a, b) = (self.values[i], other.values[j]);
                if !a.is_nan() && !b.is_nan() {
                    out.timestamps.push(ta);
                    out.left.push(a);
                    out.right.push(b);
                }
                i += 1;
                j += 1;
            }
        }
        out
    }

    /// Drop NaN points, keeping their timestamps aligned.
    pub fn dropna(&self) -> Self {
        let mut out = Self {
            timestamps: Vec::with_capacity(self.len()),
            values: Vec::with_capacity(self.len()),
        };
        for (t, &v) in self.iter() {
            if !v.is_nan() {
                out.timestamps.push(t);
                out.values.push(v);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_intersects_timestamps() {
        let a = TimeSeries::new(vec![1, 2, 3, 5], vec![0.1, 0.2, 0.3, 0.5]);
        let b = TimeSeries::new(vec![2, 3, 4, 5], vec![1.2, f64::NAN, 1.4, 1.5]);
        let aligned = a.align(&b);
        assert_eq!(aligned.timestamps, vec![2, 5]);
        assert_eq!(aligned.left, vec![0.2, 0.5]);
        assert_eq!(aligned.right, vec![1.2, 1.5]);
    }

    #[test]
    fn test_dropna() {
        let ts = TimeSeries::new(vec![10, 11, 12], vec![f64::NAN, 1.0, 2.0]);
        let clean = ts.dropna();
        assert_eq!(clean.timestamps, vec![11, 12]);
        assert_eq!(clean.values, vec![1.0, 2.0]);
    }
}
