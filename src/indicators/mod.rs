//! Technical indicators for stockseer.
//!
//! Series indicators are pure functions that take slice inputs and return Vec
//! outputs, with NaN in the warmup region. `snapshot` turns them into per-bar
//! records where warm-up values are `None`.

pub mod momentum;
pub mod rolling;
pub mod snapshot;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{macd, rsi, stochastic, williams_r, MacdResult, StochasticResult};
pub use rolling::{rolling_max, rolling_min, rolling_std};
pub use snapshot::{compute_indicators, latest_pair, IndicatorSnapshot};
pub use trend::{cci, ema, sma};
pub use volatility::{atr, bollinger_bands, true_range, BollingerBandsResult};
pub use volume::{mfi, obv};
