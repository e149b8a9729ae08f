//! The scoring rule table.
//!
//! Each `RuleGroup` is an ordered list of arms; the first arm whose condition
//! holds contributes its weight to one side and logs its reason. Groups are
//! evaluated in table order, so reasons come out in that order too.
//!
//! `BASE_RULES` is the standard scorer. `ENHANCED_RULES` only holds the extra
//! groups; the enhanced scorer runs the base table followed by it.

use crate::core::config::SignalConfig;
use crate::indicators::IndicatorSnapshot;

use super::types::Side;

/// Indicator values a rule can read, resolved from a `(latest, previous)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub prev_macd_line: f64,
    pub prev_macd_signal: f64,
    pub close: f64,
    pub sma_20: f64,
    pub sentiment: f64,
    pub bb_position: Option<f64>,
    pub stoch_k: Option<f64>,
    /// Change in on-balance volume since the previous snapshot.
    pub obv_delta: Option<f64>,
}

impl ScoreInput {
    /// Resolve the required fields, or list the ones that are missing.
    ///
    /// Fields read from the previous snapshot are reported with a
    /// "previous " prefix.
    pub fn resolve(
        latest: &IndicatorSnapshot,
        previous: &IndicatorSnapshot,
        sentiment: f64,
    ) -> Result<Self, Vec<String>> {
        let mut missing = Vec::new();
        for (prefix, snap) in [("", latest), ("previous ", previous)] {
            let fields = [
                ("RSI", snap.rsi),
                ("MACD line", snap.macd_line),
                ("MACD signal", snap.macd_signal),
                ("MACD hist", snap.macd_hist),
                ("SMA20", snap.sma_20),
                ("Close", snap.close_value()),
            ];
            for (name, value) in fields {
                if value.is_none() {
                    missing.push(format!("{prefix}{name}"));
                }
            }
        }

        match (
            latest.rsi,
            latest.macd_line,
            latest.macd_signal,
            latest.macd_hist,
            previous.macd_line,
            previous.macd_signal,
            latest.sma_20,
            latest.close_value(),
        ) {
            (
                Some(rsi),
                Some(macd_line),
                Some(macd_signal),
                Some(macd_hist),
                Some(prev_macd_line),
                Some(prev_macd_signal),
                Some(sma_20),
                Some(close),
            ) if missing.is_empty() => Ok(Self {
                rsi,
                macd_line,
                macd_signal,
                macd_hist,
                prev_macd_line,
                prev_macd_signal,
                close,
                sma_20,
                sentiment,
                bb_position: latest.bb_position,
                stoch_k: latest.stoch_k,
                obv_delta: latest.obv.zip(previous.obv).map(|(now, before)| now - before),
            }),
            _ => Err(missing),
        }
    }
}

/// One row of a rule group: (condition, side, score delta, reason template).
pub struct RuleArm {
    pub side: Side,
    pub weight: f64,
    pub when: fn(&ScoreInput, &SignalConfig) -> bool,
    pub reason: fn(&ScoreInput, &SignalConfig) -> String,
}

/// Mutually exclusive arms evaluated top to bottom.
pub struct RuleGroup {
    pub name: &'static str,
    /// Groups whose inputs are absent are skipped entirely.
    pub applies: fn(&ScoreInput) -> bool,
    pub arms: &'static [RuleArm],
}

/// A rule that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub group: &'static str,
    pub side: Side,
    pub weight: f64,
    pub reason: String,
}

impl RuleGroup {
    /// First matching arm, if any.
    pub fn evaluate(&self, input: &ScoreInput, config: &SignalConfig) -> Option<Contribution> {
        if !(self.applies)(input) {
            return None;
        }
        self.arms
            .iter()
            .find(|arm| (arm.when)(input, config))
            .map(|arm| Contribution {
                group: self.name,
                side: arm.side,
                weight: arm.weight,
                reason: (arm.reason)(input, config),
            })
    }
}

fn always(_: &ScoreInput) -> bool {
    true
}

/// Standard rule table.
pub static BASE_RULES: &[RuleGroup] = &[
    RuleGroup {
        name: "rsi",
        applies: always,
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 2.0,
                when: |i, c| i.rsi < c.rsi_oversold,
                reason: |i, c| format!("RSI ({:.2}) < {} (oversold)", i.rsi, c.rsi_oversold),
            },
            RuleArm {
                side: Side::Buy,
                weight: 1.0,
                when: |i, c| i.rsi < c.rsi_near_oversold,
                reason: |i, c| {
                    format!("RSI ({:.2}) < {} (nearing oversold)", i.rsi, c.rsi_near_oversold)
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 2.0,
                when: |i, c| i.rsi > c.rsi_overbought,
                reason: |i, c| format!("RSI ({:.2}) > {} (overbought)", i.rsi, c.rsi_overbought),
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.0,
                when: |i, c| i.rsi > c.rsi_near_overbought,
                reason: |i, c| {
                    format!("RSI ({:.2}) > {} (nearing overbought)", i.rsi, c.rsi_near_overbought)
                },
            },
            RuleArm {
                side: Side::Neutral,
                weight: 0.0,
                when: |_, _| true,
                reason: |i, _| format!("RSI ({:.2}) is neutral", i.rsi),
            },
        ],
    },
    RuleGroup {
        name: "macd_cross",
        applies: always,
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 2.0,
                when: |i, _| i.macd_line > i.macd_signal && i.prev_macd_line <= i.prev_macd_signal,
                reason: |i, _| {
                    format!(
                        "MACD bullish crossover (line {:.4} > signal {:.4})",
                        i.macd_line, i.macd_signal
                    )
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 2.0,
                when: |i, _| i.macd_line < i.macd_signal && i.prev_macd_line >= i.prev_macd_signal,
                reason: |i, _| {
                    format!(
                        "MACD bearish crossover (line {:.4} < signal {:.4})",
                        i.macd_line, i.macd_signal
                    )
                },
            },
            RuleArm {
                side: Side::Buy,
                weight: 1.0,
                when: |i, _| i.macd_line > i.macd_signal,
                reason: |i, _| {
                    format!(
                        "MACD line {:.4} > signal {:.4} (bullish)",
                        i.macd_line, i.macd_signal
                    )
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.0,
                when: |i, _| i.macd_line < i.macd_signal,
                reason: |i, _| {
                    format!(
                        "MACD line {:.4} < signal {:.4} (bearish)",
                        i.macd_line, i.macd_signal
                    )
                },
            },
        ],
    },
    RuleGroup {
        name: "macd_hist",
        applies: always,
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 0.5,
                when: |i, _| i.macd_hist > 0.0,
                reason: |i, _| format!("MACD hist ({:.4}) positive", i.macd_hist),
            },
            RuleArm {
                side: Side::Sell,
                weight: 0.5,
                when: |i, _| i.macd_hist < 0.0,
                reason: |i, _| format!("MACD hist ({:.4}) negative", i.macd_hist),
            },
        ],
    },
    RuleGroup {
        name: "sma_20",
        applies: always,
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 1.0,
                when: |i, _| i.close > i.sma_20,
                reason: |i, _| format!("Price ({:.2}) > SMA20 ({:.2})", i.close, i.sma_20),
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.0,
                when: |i, _| i.close < i.sma_20,
                reason: |i, _| format!("Price ({:.2}) < SMA20 ({:.2})", i.close, i.sma_20),
            },
        ],
    },
    RuleGroup {
        name: "sentiment",
        applies: always,
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 1.5,
                when: |i, c| i.sentiment > c.sentiment_strong,
                reason: |i, _| format!("News sentiment strongly positive ({:.2})", i.sentiment),
            },
            RuleArm {
                side: Side::Buy,
                weight: 0.5,
                when: |i, c| i.sentiment > c.sentiment_mild,
                reason: |i, _| format!("News sentiment mildly positive ({:.2})", i.sentiment),
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.5,
                when: |i, c| i.sentiment < -c.sentiment_strong,
                reason: |i, _| format!("News sentiment strongly negative ({:.2})", i.sentiment),
            },
            RuleArm {
                side: Side::Sell,
                weight: 0.5,
                when: |i, c| i.sentiment < -c.sentiment_mild,
                reason: |i, _| format!("News sentiment mildly negative ({:.2})", i.sentiment),
            },
            RuleArm {
                side: Side::Neutral,
                weight: 0.0,
                when: |_, _| true,
                reason: |i, _| format!("News sentiment neutral ({:.2})", i.sentiment),
            },
        ],
    },
];

/// Extra groups appended by the enhanced scorer.
pub static ENHANCED_RULES: &[RuleGroup] = &[
    RuleGroup {
        name: "bollinger",
        applies: |i| i.bb_position.is_some(),
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 1.0,
                when: |i, c| i.bb_position.is_some_and(|p| p < c.bb_lower),
                reason: |i, _| {
                    format!(
                        "Price near lower Bollinger Band (position {:.2})",
                        i.bb_position.unwrap_or(f64::NAN)
                    )
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.0,
                when: |i, c| i.bb_position.is_some_and(|p| p > c.bb_upper),
                reason: |i, _| {
                    format!(
                        "Price near upper Bollinger Band (position {:.2})",
                        i.bb_position.unwrap_or(f64::NAN)
                    )
                },
            },
        ],
    },
    RuleGroup {
        name: "stochastic",
        applies: |i| i.stoch_k.is_some(),
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 1.0,
                when: |i, c| i.stoch_k.is_some_and(|k| k < c.stoch_oversold),
                reason: |i, _| {
                    format!("Stochastic %K ({:.2}) oversold", i.stoch_k.unwrap_or(f64::NAN))
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 1.0,
                when: |i, c| i.stoch_k.is_some_and(|k| k > c.stoch_overbought),
                reason: |i, _| {
                    format!("Stochastic %K ({:.2}) overbought", i.stoch_k.unwrap_or(f64::NAN))
                },
            },
        ],
    },
    RuleGroup {
        name: "obv",
        applies: |i| i.obv_delta.is_some(),
        arms: &[
            RuleArm {
                side: Side::Buy,
                weight: 0.5,
                when: |i, _| i.obv_delta.is_some_and(|d| d > 0.0),
                reason: |i, _| {
                    format!("OBV increasing ({:+.0}, bullish volume)", i.obv_delta.unwrap_or(f64::NAN))
                },
            },
            RuleArm {
                side: Side::Sell,
                weight: 0.5,
                when: |_, _| true,
                reason: |i, _| {
                    format!(
                        "OBV not increasing ({:+.0}, bearish volume)",
                        i.obv_delta.unwrap_or(f64::NAN)
                    )
                },
            },
        ],
    },
];
