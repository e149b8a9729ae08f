//! StockSeer - quantitative analytics core.
//!
//! This crate turns a chronological series of price bars into:
//! - Technical indicators (SMA, EMA, RSI, MACD, Bollinger Bands, etc.)
//! - A weighted-score trading signal with the reasons behind it
//! - Risk and performance metrics (volatility, Sharpe, Sortino, drawdown, beta, CAGR)
//! - Rolling correlation between return series
//! - Monte Carlo projections of portfolio value
//!
//! Every computation is a pure function over caller-owned inputs. The library
//! emits `tracing` events and leaves subscriber setup to the caller.

pub mod analysis;
pub mod cache;
pub mod core;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod signals;

pub use analysis::{AnalysisReport, Analyzer};
pub use cache::{fingerprint_bars, ResultCache, TtlCache};
pub use crate::core::{AnalyticsConfig, Bar, Result, SeerError, TimeSeries};
pub use indicators::{compute_indicators, IndicatorSnapshot};
pub use metrics::{RiskMetrics, ReturnSeries};
pub use portfolio::{simulate, SimulationOutput, SimulationParams};
pub use signals::{Signal, SignalKind, SignalScorer};
