//! Risk and performance metrics for stockseer.

pub mod correlation;
pub mod drawdown;
pub mod performance;
pub mod returns;
pub mod risk;
pub mod stats;

pub use correlation::{overall_correlation, rolling_correlation};
pub use drawdown::{drawdown_curve, max_drawdown, DrawdownTracker, MaxDrawdown};
pub use performance::{
    advanced_metrics, cagr, cagr_with_min_years, calmar, historical_performance,
    project_future_value, span_years, AdvancedMetrics, HistoricalPerformance,
};
pub use returns::{returns_from_bars, simple_returns, total_return, ReturnSeries};
pub use risk::{
    beta, historical_volatility, risk_metrics, sharpe, sortino, volatility, RiskLevel,
    RiskMetrics,
};
pub use stats::RunningStats;
