//! Weighted-score signal classifier.

use crate::core::config::SignalConfig;
use crate::indicators::IndicatorSnapshot;

use super::rules::{RuleGroup, ScoreInput, BASE_RULES, ENHANCED_RULES};
use super::types::{Side, Signal, SignalKind};

/// Scores an indicator snapshot pair against the rule tables.
#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    pub config: SignalConfig,
}

impl SignalScorer {
    /// Create a scorer with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom thresholds.
    pub fn with_config(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Classify using the base rule table.
    pub fn classify(
        &self,
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        sentiment: f64,
    ) -> Signal {
        self.evaluate(&[BASE_RULES], latest, previous, sentiment)
    }

    /// Classify using the base table followed by the Bollinger, Stochastic
    /// and OBV groups.
    pub fn classify_enhanced(
        &self,
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        sentiment: f64,
    ) -> Signal {
        self.evaluate(&[BASE_RULES, ENHANCED_RULES], latest, previous, sentiment)
    }

    /// Run the given tables in order and classify the resulting score gap.
    pub fn evaluate(
        &self,
        tables: &[&[RuleGroup]],
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        sentiment: f64,
    ) -> Signal {
        let input = match self.prepare(latest, previous, sentiment) {
            Ok(input) => input,
            Err(signal) => return signal,
        };

        let mut buy_score = 0.0;
        let mut sell_score = 0.0;
        let mut reasons = Vec::new();

        for group in tables.iter().flat_map(|table| table.iter()) {
            let Some(hit) = group.evaluate(&input, &self.config) else {
                continue;
            };
            match hit.side {
                Side::Buy => buy_score += hit.weight,
                Side::Sell => sell_score += hit.weight,
                Side::Neutral => {}
            }
            reasons.push(hit.reason);
        }

        let kind = SignalKind::from_gap(buy_score - sell_score, self.config.gap, self.config.strong_gap);
        tracing::debug!(
            index = latest.index,
            buy_score,
            sell_score,
            %kind,
            "scored signal"
        );

        Signal { kind, reasons, buy_score, sell_score }
    }

    fn prepare(
        &self,
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        sentiment: f64,
    ) -> Result<ScoreInput, Signal> {
        let available = latest.bars_available();
        let required = self.config.min_bars;
        let resolved = ScoreInput::resolve(latest, previous, sentiment);

        if available < required {
            let mut reason = format!("Insufficient data: need {required} bars, have {available}");
            if let Err(missing) = &resolved {
                reason.push_str("; missing: ");
                reason.push_str(&missing.join(", "));
            }
            return Err(Signal::not_available(reason));
        }

        resolved.map_err(|missing| {
            Signal::not_available(format!(
                "Indicators not computable: {} (have {available} bars, need {required})",
                missing.join(", ")
            ))
        })
    }
}

/// Classify with default thresholds and an explicit minimum bar count.
pub fn classify(
    latest: &IndicatorSnapshot,
    previous: &IndicatorSnapshot,
    sentiment: f64,
    min_bars: usize,
) -> Signal {
    let config = SignalConfig { min_bars, ..SignalConfig::default() };
    SignalScorer::with_config(config).classify(latest, previous, sentiment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(index: usize) -> IndicatorSnapshot {
        IndicatorSnapshot {
            index,
            close: 100.0,
            rsi: Some(50.0),
            macd_line: Some(0.5),
            macd_signal: Some(0.5),
            macd_hist: Some(0.0),
            sma_20: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_neutral_inputs_hold() {
        let signal = SignalScorer::new().classify(&snapshot(40), &snapshot(39), 0.0);
        assert_eq!(signal.kind, SignalKind::Hold);
        assert_eq!(signal.buy_score, 0.0);
        assert_eq!(signal.sell_score, 0.0);
        // RSI and sentiment still log a neutral reason
        assert_eq!(signal.reasons.len(), 2);
    }

    #[test]
    fn test_too_few_bars() {
        let signal = classify(&snapshot(20), &snapshot(19), 0.0, 35);
        assert_eq!(signal.kind, SignalKind::NotAvailable);
        assert!(signal.reasons[0].contains("need 35 bars, have 21"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let latest = IndicatorSnapshot { macd_signal: None, ..snapshot(40) };
        let signal = SignalScorer::new().classify(&latest, &snapshot(39), 0.0);
        assert_eq!(signal.kind, SignalKind::NotAvailable);
        assert!(signal.reasons[0].contains("MACD signal"));
        assert!(!signal.reasons[0].contains("previous"));
    }

    #[test]
    fn test_bearish_crossover() {
        let previous = IndicatorSnapshot { macd_line: Some(0.6), macd_signal: Some(0.5), ..snapshot(39) };
        let latest = IndicatorSnapshot {
            rsi: Some(75.0),
            macd_line: Some(0.4),
            macd_signal: Some(0.5),
            macd_hist: Some(-0.1),
            close: 98.0,
            ..snapshot(40)
        };
        let signal = SignalScorer::new().classify(&latest, &previous, -0.3);
        assert_eq!(signal.sell_score, 2.0 + 2.0 + 0.5 + 1.0 + 1.5);
        assert_eq!(signal.kind, SignalKind::StrongSell);
        assert!(signal.reasons.iter().any(|r| r.contains("bearish crossover")));
    }

    #[test]
    fn test_enhanced_adds_extension_scores() {
        let mut latest = snapshot(40);
        latest.bb_position = Some(0.1);
        latest.stoch_k = Some(15.0);
        latest.obv = Some(2_000.0);
        let mut previous = snapshot(39);
        previous.obv = Some(1_000.0);

        let scorer = SignalScorer::new();
        let base = scorer.classify(&latest, &previous, 0.0);
        let enhanced = scorer.classify_enhanced(&latest, &previous, 0.0);
        assert_eq!(enhanced.buy_score - base.buy_score, 2.5);
        assert_eq!(enhanced.kind, SignalKind::Buy);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SignalConfig { rsi_near_overbought: 45.0, ..SignalConfig::default() };
        let signal = SignalScorer::with_config(config).classify(&snapshot(40), &snapshot(39), 0.0);
        assert_eq!(signal.sell_score, 1.0);
    }
}
