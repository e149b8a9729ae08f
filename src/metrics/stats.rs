//! Descriptive statistics shared by the risk metrics and the simulator.
//!
//! `RunningStats` is a single-pass accumulator (Welford's algorithm); the free
//! functions cover the order statistics and higher moments that need the
//! whole sample.

/// Single-pass mean/variance accumulator.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self { count: 0, mean: 0.0, m2: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    /// Accumulate every value of a slice.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut stats = Self::new();
        values.iter().for_each(|&v| stats.update(v));
        stats
    }

    /// Add one observation.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sample variance (ddof = 1), `None` below two observations.
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Population variance (ddof = 0).
    pub fn variance_population(&self) -> Option<f64> {
        (self.count >= 1).then(|| self.m2 / self.count as f64)
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    RunningStats::from_slice(values).std_dev()
}

/// Sample covariance (ddof = 1) of two equal-length slices.
pub fn covariance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let (ma, mb) = (mean(a)?, mean(b)?);
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    Some(sum / (a.len() - 1) as f64)
}

/// Pearson correlation; `None` when either side has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let cov = covariance(a, b)?;
    let (sa, sb) = (sample_std(a)?, sample_std(b)?);
    if sa == 0.0 || sb == 0.0 {
        return None;
    }
    Some((cov / (sa * sb)).clamp(-1.0, 1.0))
}

/// Percentile of an ascending-sorted slice with linear interpolation between
/// closest ranks. `q` is in percent (0..=100).
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Percentile of an unsorted slice; NaNs are ignored.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, q)
}

fn central_moments(values: &[f64]) -> Option<(f64, f64, f64)> {
    let n = values.len() as f64;
    let m = mean(values)?;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((m2 / n, m3 / n, m4 / n))
}

/// Bias-corrected sample skewness (adjusted Fisher-Pearson).
///
/// Needs three values; a constant sample has zero skew.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values)?;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    let g1 = m3 / m2.powf(1.5);
    Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Bias-corrected excess kurtosis.
///
/// Needs four values; a constant sample has zero excess kurtosis.
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values)?;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_running_stats_matches_two_pass() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = RunningStats::from_slice(&values);
        assert_eq!(stats.count(), 8);
        assert!(close(stats.mean(), 5.0));
        assert!(close(stats.variance_population().unwrap(), 4.0));
        assert!(close(stats.variance().unwrap(), 32.0 / 7.0));
        assert_eq!(stats.min(), 2.0);
        assert_eq!(stats.max(), 9.0);
    }

    #[test]
    fn test_std_needs_two_values() {
        assert!(sample_std(&[1.0]).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_percentile_linear() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert!(close(percentile(&values, 5.0).unwrap(), 1.2));
        assert!(close(percentile(&[10.0, 0.0], 25.0).unwrap(), 2.5));
    }

    #[test]
    fn test_pearson() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!(close(pearson(&a, &b).unwrap(), 1.0));
        assert!(pearson(&a, &[1.0; 4]).is_none());
    }

    #[test]
    fn test_higher_moments() {
        let symmetric = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(close(skewness(&symmetric).unwrap(), 0.0));
        // pandas: Series([1, 2, 3, 4, 5]).kurt() == -1.2
        assert!(close(excess_kurtosis(&symmetric).unwrap(), -1.2));
        assert!(skewness(&[1.0, 2.0]).is_none());
        assert!(skewness(&[1.0, 10.0, 1.0, 1.0]).unwrap() > 0.0);
    }
}
