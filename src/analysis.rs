//! One-call pipeline: indicators, both signal variants and the risk record.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{fingerprint_bars, ResultCache};
use crate::core::config::AnalyticsConfig;
use crate::core::types::Bar;
use crate::indicators::{compute_indicators, latest_pair, IndicatorSnapshot};
use crate::metrics::correlation::rolling_correlation;
use crate::metrics::returns::returns_from_bars;
use crate::metrics::risk::{risk_metrics, RiskMetrics};
use crate::signals::{Signal, SignalScorer};

/// Everything `Analyzer::analyze` produces for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Latest snapshot, `None` for an empty or rejected bar sequence.
    pub snapshot: Option<IndicatorSnapshot>,
    pub signal: Signal,
    pub enhanced_signal: Signal,
    pub risk: RiskMetrics,
    /// Latest rolling correlation of returns with the benchmark.
    pub benchmark_correlation: Option<f64>,
}

/// Shared cache type accepted by `Analyzer::with_cache`.
pub type ReportCache = Arc<dyn ResultCache<u64, AnalysisReport>>;

/// Runs the full analysis with one configuration.
#[derive(Clone, Default)]
pub struct Analyzer {
    config: AnalyticsConfig,
    scorer: SignalScorer,
    cache: Option<ReportCache>,
}

impl Analyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        let scorer = SignalScorer::with_config(config.signal.clone());
        Self { config, scorer, cache: None }
    }

    /// Reuse reports from `cache` for identical inputs.
    pub fn with_cache(mut self, cache: ReportCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Analyze `bars`, optionally against a benchmark, with a sentiment score
    /// in [-1, 1].
    pub fn analyze(&self, bars: &[Bar], benchmark: Option<&[Bar]>, sentiment: f64) -> AnalysisReport {
        let Some(cache) = &self.cache else {
            return self.compute(bars, benchmark, sentiment);
        };

        let key = self.cache_key(bars, benchmark, sentiment);
        if let Some(report) = cache.get(&key) {
            tracing::debug!(key, "analysis cache hit");
            return report;
        }
        tracing::debug!(key, "analysis cache miss");
        let report = self.compute(bars, benchmark, sentiment);
        cache.insert(key, report.clone());
        report
    }

    fn compute(&self, bars: &[Bar], benchmark: Option<&[Bar]>, sentiment: f64) -> AnalysisReport {
        let snapshots = compute_indicators(bars);
        let (signal, enhanced_signal) = match latest_pair(&snapshots) {
            Some((latest, previous)) => (
                self.scorer.classify(latest, previous, sentiment),
                self.scorer.classify_enhanced(latest, previous, sentiment),
            ),
            None => {
                let reason = format!(
                    "Insufficient data: need {} bars, have 0 usable",
                    self.config.signal.min_bars
                );
                (Signal::not_available(reason.clone()), Signal::not_available(reason))
            }
        };

        AnalysisReport {
            snapshot: snapshots.last().cloned(),
            signal,
            enhanced_signal,
            risk: risk_metrics(bars, benchmark, &self.config.risk),
            benchmark_correlation: benchmark.and_then(|b| self.latest_correlation(bars, b)),
        }
    }

    fn latest_correlation(&self, bars: &[Bar], benchmark: &[Bar]) -> Option<f64> {
        let stock = returns_from_bars(bars).ok()?;
        let index = returns_from_bars(benchmark).ok()?;
        let rolling = rolling_correlation(&stock, &index, self.config.risk.correlation_window).ok()?;
        rolling.last().copied().filter(|v| !v.is_nan())
    }

    fn cache_key(&self, bars: &[Bar], benchmark: Option<&[Bar]>, sentiment: f64) -> u64 {
        let mut hasher = DefaultHasher::new();
        fingerprint_bars(bars).hash(&mut hasher);
        benchmark.map(fingerprint_bars).hash(&mut hasher);
        sentiment.to_bits().hash(&mut hasher);
        // f64 thresholds, so hash the serialized form
        serde_json::to_string(&self.config).unwrap_or_default().hash(&mut hasher);
        hasher.finish()
    }
}
