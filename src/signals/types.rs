//! Signal value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
    /// Not enough data or a required indicator is missing.
    NotAvailable,
}

impl SignalKind {
    /// Classify a score gap (`buy - sell`) against the hold and strong gaps.
    pub fn from_gap(diff: f64, gap: f64, strong_gap: f64) -> Self {
        if diff > strong_gap {
            SignalKind::StrongBuy
        } else if diff > gap {
            SignalKind::Buy
        } else if diff < -strong_gap {
            SignalKind::StrongSell
        } else if diff < -gap {
            SignalKind::Sell
        } else {
            SignalKind::Hold
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalKind::StrongBuy => "STRONG BUY",
            SignalKind::Buy => "BUY",
            SignalKind::Hold => "HOLD",
            SignalKind::Sell => "SELL",
            SignalKind::StrongSell => "STRONG SELL",
            SignalKind::NotAvailable => "N/A",
        };
        f.write_str(label)
    }
}

/// Which score a rule contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
    /// Logged as a reason, scores nothing.
    Neutral,
}

/// A classified recommendation with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Contributing reasons in evaluation order.
    pub reasons: Vec<String>,
    pub buy_score: f64,
    pub sell_score: f64,
}

impl Signal {
    /// An unavailable signal carrying a single reason.
    pub fn not_available(reason: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::NotAvailable,
            reasons: vec![reason.into()],
            buy_score: 0.0,
            sell_score: 0.0,
        }
    }

    /// Reasons joined into one line.
    pub fn explanation(&self) -> String {
        self.reasons.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_boundaries_are_exclusive() {
        assert_eq!(SignalKind::from_gap(2.5, 1.0, 2.5), SignalKind::Buy);
        assert_eq!(SignalKind::from_gap(2.51, 1.0, 2.5), SignalKind::StrongBuy);
        assert_eq!(SignalKind::from_gap(1.0, 1.0, 2.5), SignalKind::Hold);
        assert_eq!(SignalKind::from_gap(-1.0, 1.0, 2.5), SignalKind::Hold);
        assert_eq!(SignalKind::from_gap(-1.5, 1.0, 2.5), SignalKind::Sell);
        assert_eq!(SignalKind::from_gap(-3.0, 1.0, 2.5), SignalKind::StrongSell);
    }

    #[test]
    fn test_display_and_serde_names() {
        assert_eq!(SignalKind::StrongSell.to_string(), "STRONG SELL");
        assert_eq!(
            serde_json::to_string(&SignalKind::NotAvailable).unwrap(),
            "\"NOT_AVAILABLE\""
        );
    }
}
