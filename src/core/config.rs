//! Tunable parameters for the analytics core.
//!
//! Every section has a `Default` holding the stock thresholds and can be
//! partially overridden from JSON; missing keys fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{Result, SeerError};

/// Thresholds used by the signal scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Minimum number of bars before a signal is produced.
    pub min_bars: usize,
    /// RSI strictly below this is oversold (+2 buy).
    pub rsi_oversold: f64,
    /// RSI strictly below this is nearing oversold (+1 buy).
    pub rsi_near_oversold: f64,
    /// RSI strictly above this is overbought (+2 sell).
    pub rsi_overbought: f64,
    /// RSI strictly above this is nearing overbought (+1 sell).
    pub rsi_near_overbought: f64,
    /// Sentiment magnitude for the strong (1.5) contribution.
    pub sentiment_strong: f64,
    /// Sentiment magnitude for the mild (0.5) contribution.
    pub sentiment_mild: f64,
    /// Score gap above which the signal is STRONG.
    pub strong_gap: f64,
    /// Score gap above which the signal leaves HOLD.
    pub gap: f64,
    /// Bollinger %B below which price is near the lower band.
    pub bb_lower: f64,
    /// Bollinger %B above which price is near the upper band.
    pub bb_upper: f64,
    /// Stochastic %K oversold level.
    pub stoch_oversold: f64,
    /// Stochastic %K overbought level.
    pub stoch_overbought: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_bars: 35,
            rsi_oversold: 30.0,
            rsi_near_oversold: 40.0,
            rsi_overbought: 70.0,
            rsi_near_overbought: 60.0,
            sentiment_strong: 0.2,
            sentiment_mild: 0.05,
            strong_gap: 2.5,
            gap: 1.0,
            bb_lower: 0.2,
            bb_upper: 0.8,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
        }
    }
}

/// Parameters for risk and performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Trading periods per year used for annualization.
    pub periods_per_year: f64,
    /// Trailing window (in returns) for the volatility estimate.
    pub volatility_window: usize,
    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,
    /// Window for rolling correlation.
    pub correlation_window: usize,
    /// Shortest span, in years, for which CAGR is reported.
    pub min_cagr_years: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252.0,
            volatility_window: 60,
            risk_free_rate: 0.03,
            correlation_window: 30,
            min_cagr_years: 0.1,
        }
    }
}

/// Upper bounds on Monte Carlo work, checked before any path is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationLimits {
    /// Maximum number of paths per run.
    pub max_paths: usize,
    /// Maximum number of periods per path.
    pub max_horizon_periods: usize,
    /// Maximum number of stored values across all paths,
    /// `path_count * (horizon_periods + 1)`.
    pub max_path_steps: usize,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_paths: 10_000,
            // 40 years of daily steps
            max_horizon_periods: 40 * 252,
            // about 40 MB of path values
            max_path_steps: 5_000_000,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub signal: SignalConfig,
    pub risk: RiskConfig,
    pub simulation: SimulationLimits,
}

impl AnalyticsConfig {
    /// Parse from a JSON document and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON file and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.signal;
        if s.min_bars < 2 {
            return Err(SeerError::invalid_config("signal.min_bars must be >= 2"));
        }
        if !(s.rsi_oversold <= s.rsi_near_oversold
            && s.rsi_near_oversold <= s.rsi_near_overbought
            && s.rsi_near_overbought <= s.rsi_overbought)
        {
            return Err(SeerError::invalid_config(
                "RSI thresholds must satisfy oversold <= near_oversold <= near_overbought <= overbought",
            ));
        }
        if !(0.0 <= s.sentiment_mild && s.sentiment_mild <= s.sentiment_strong) {
            return Err(SeerError::invalid_config(
                "sentiment thresholds must satisfy 0 <= mild <= strong",
            ));
        }
        if !(0.0 <= s.gap && s.gap <= s.strong_gap) {
            return Err(SeerError::invalid_config("score gaps must satisfy 0 <= gap <= strong_gap"));
        }

        let r = &self.risk;
        if !(r.periods_per_year > 0.0) {
            return Err(SeerError::invalid_config("risk.periods_per_year must be > 0"));
        }
        if r.volatility_window < 2 {
            return Err(SeerError::invalid_config("risk.volatility_window must be >= 2"));
        }
        if r.correlation_window < 2 {
            return Err(SeerError::invalid_config("risk.correlation_window must be >= 2"));
        }

        let m = &self.simulation;
        if m.max_paths == 0 || m.max_horizon_periods == 0 || m.max_path_steps == 0 {
            return Err(SeerError::invalid_config("simulation limits must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalyticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            AnalyticsConfig::from_json_str(r#"{"signal": {"sentiment_strong": 0.3}}"#).unwrap();
        assert_eq!(config.signal.sentiment_strong, 0.3);
        assert_eq!(config.signal.sentiment_mild, 0.05);
        assert_eq!(config.risk, RiskConfig::default());
    }

    #[test]
    fn test_rejects_inverted_rsi_bands() {
        let json = r#"{"signal": {"rsi_oversold": 50.0, "rsi_near_oversold": 40.0}}"#;
        assert!(matches!(
            AnalyticsConfig::from_json_str(json),
            Err(SeerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_path_steps() {
        let json = r#"{"simulation": {"max_path_steps": 0}}"#;
        assert!(matches!(
            AnalyticsConfig::from_json_str(json),
            Err(SeerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AnalyticsConfig::from_json_str("{not json"),
            Err(SeerError::ConfigParse(_))
        ));
    }
}
