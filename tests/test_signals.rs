//! Integration tests for signal scoring.

use stockseer::core::{Bar, SignalConfig};
use stockseer::indicators::{compute_indicators, latest_pair, IndicatorSnapshot};
use stockseer::signals::{classify, SignalKind, SignalScorer};

fn snapshot(index: usize) -> IndicatorSnapshot {
    IndicatorSnapshot {
        index,
        close: 100.0,
        rsi: Some(50.0),
        macd_line: Some(0.0),
        macd_signal: Some(0.0),
        macd_hist: Some(0.0),
        sma_20: Some(100.0),
        ..Default::default()
    }
}

/// Oversold RSI, a fresh bullish MACD crossover and price above SMA20.
fn oversold_crossover() -> (IndicatorSnapshot, IndicatorSnapshot) {
    let previous = IndicatorSnapshot {
        rsi: Some(24.0),
        macd_line: Some(-0.30),
        macd_signal: Some(-0.25),
        macd_hist: Some(-0.05),
        close: 99.0,
        ..snapshot(38)
    };
    let latest = IndicatorSnapshot {
        rsi: Some(25.3),
        macd_line: Some(-0.20),
        macd_signal: Some(-0.22),
        macd_hist: Some(0.02),
        close: 101.0,
        sma_20: Some(100.0),
        ..snapshot(39)
    };
    (latest, previous)
}

#[test]
fn test_strong_buy_scenario() {
    let (latest, previous) = oversold_crossover();
    let signal = classify(&latest, &previous, 0.3, 35);

    assert_eq!(signal.kind, SignalKind::StrongBuy);
    assert_eq!(signal.buy_score, 2.0 + 2.0 + 0.5 + 1.0 + 1.5);
    assert_eq!(signal.sell_score, 0.0);

    let text = signal.explanation().to_lowercase();
    assert!(text.contains("oversold"), "{}", text);
    assert!(text.contains("bullish crossover"), "{}", text);
    assert!(text.contains("0.30"), "{}", text);
    assert!(text.contains("25.30"), "{}", text);
}

#[test]
fn test_reasons_follow_table_order() {
    let (latest, previous) = oversold_crossover();
    let signal = classify(&latest, &previous, 0.3, 35);
    let order: Vec<usize> = ["RSI", "MACD bullish", "MACD hist", "SMA20", "sentiment"]
        .iter()
        .map(|needle| signal.reasons.iter().position(|r| r.contains(needle)).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{:?}", signal.reasons);
}

#[test]
fn test_not_available_names_counts_and_fields() {
    let latest = IndicatorSnapshot { index: 29, close: 10.0, ..Default::default() };
    let previous = IndicatorSnapshot { index: 28, close: 10.0, ..Default::default() };
    let signal = classify(&latest, &previous, 0.0, 35);

    assert_eq!(signal.kind, SignalKind::NotAvailable);
    assert_eq!(signal.reasons.len(), 1);
    let reason = &signal.reasons[0];
    assert!(reason.contains("need 35 bars, have 30"), "{}", reason);
    assert!(reason.contains("MACD signal"), "{}", reason);
    assert!(reason.contains("previous RSI"), "{}", reason);
}

#[test]
fn test_missing_previous_field_only() {
    let previous = IndicatorSnapshot { macd_line: None, ..snapshot(49) };
    let signal = classify(&snapshot(50), &previous, 0.0, 35);
    assert_eq!(signal.kind, SignalKind::NotAvailable);
    assert!(signal.reasons[0].contains("previous MACD line"));
}

#[test]
fn test_classification_gaps() {
    let scorer = SignalScorer::new();

    // close above SMA20 only: +1 buy, gap not exceeded
    let latest = IndicatorSnapshot { close: 101.0, ..snapshot(40) };
    assert_eq!(scorer.classify(&latest, &snapshot(39), 0.0).kind, SignalKind::Hold);

    // +1 close, +0.5 mild sentiment
    let signal = scorer.classify(&latest, &snapshot(39), 0.1);
    assert_eq!(signal.buy_score, 1.5);
    assert_eq!(signal.kind, SignalKind::Buy);

    // RSI 65 (+1 sell), close below (+1 sell)
    let latest = IndicatorSnapshot { rsi: Some(65.0), close: 99.0, ..snapshot(40) };
    let signal = scorer.classify(&latest, &snapshot(39), -0.1);
    assert_eq!(signal.sell_score, 2.5);
    assert_eq!(signal.kind, SignalKind::Sell);
}

#[test]
fn test_enhanced_extension_skips_missing_inputs() {
    let scorer = SignalScorer::new();
    let (latest, previous) = oversold_crossover();
    let base = scorer.classify(&latest, &previous, 0.3);
    let enhanced = scorer.classify_enhanced(&latest, &previous, 0.3);
    assert_eq!(base, enhanced);

    let latest = IndicatorSnapshot {
        bb_position: Some(0.9),
        stoch_k: Some(85.0),
        obv: Some(500.0),
        ..snapshot(40)
    };
    let previous = IndicatorSnapshot { obv: Some(500.0), ..snapshot(39) };
    let enhanced = scorer.classify_enhanced(&latest, &previous, 0.0);
    assert_eq!(enhanced.sell_score, 2.5);
    assert_eq!(enhanced.kind, SignalKind::Sell);
    assert!(enhanced.reasons.iter().any(|r| r.contains("OBV")));
}

#[test]
fn test_configurable_thresholds() {
    let config = SignalConfig { rsi_oversold: 20.0, rsi_near_oversold: 26.0, ..SignalConfig::default() };
    let (latest, previous) = oversold_crossover();
    let signal = SignalScorer::with_config(config).classify(&latest, &previous, 0.3);
    assert_eq!(signal.buy_score, 1.0 + 2.0 + 0.5 + 1.0 + 1.5);
}

#[test]
fn test_classify_from_bars_is_deterministic() {
    let bars: Vec<Bar> = (0..80)
        .map(|i| {
            let c = 100.0 - i as f64 * 0.4 + (i as f64 * 0.7).sin();
            Bar::new(i, c, c + 1.0, c - 1.0, c, 1_000.0)
        })
        .collect();
    let snapshots = compute_indicators(&bars);
    let (latest, previous) = latest_pair(&snapshots).unwrap();

    let first = classify(latest, previous, -0.4, 35);
    let second = classify(latest, previous, -0.4, 35);
    assert_ne!(first.kind, SignalKind::NotAvailable);
    assert_eq!(first, second);
}
