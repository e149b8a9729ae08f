//! Per-bar indicator snapshots.
//!
//! `compute_indicators` runs every series indicator over a bar sequence and
//! transposes the columns into one `IndicatorSnapshot` per bar. Warm-up NaNs
//! from the series functions become `None`, so a value that is not yet
//! computable can never be mistaken for zero.

use serde::{Deserialize, Serialize};

use super::momentum::{macd, rsi, stochastic, williams_r};
use super::rolling::windowed;
use super::trend::{cci, ema, sma};
use super::volatility::{atr, bollinger_bands};
use super::volume::{mfi, obv};
use crate::core::types::{validate_bars, Bar, OhlcvData, Timestamp};
use crate::core::Result;

/// Derived indicators for a single bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Position of the bar in the input; `index + 1` bars are available.
    pub index: usize,
    pub timestamp: Timestamp,
    pub close: f64,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
    pub rsi: Option<f64>,
    /// SMA of the RSI line.
    pub rsi_ma: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_high: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_low: Option<f64>,
    /// (high - low) / mid
    pub bb_width: Option<f64>,
    /// %B: (close - low) / (high - low)
    pub bb_position: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub williams_r: Option<f64>,
    pub cci: Option<f64>,
    pub atr: Option<f64>,
    pub obv: Option<f64>,
    pub mfi: Option<f64>,
}

impl IndicatorSnapshot {
    /// Number of bars available up to and including this snapshot.
    #[inline]
    pub fn bars_available(&self) -> usize {
        self.index + 1
    }

    /// Close as an optional value (non-finite closes read as missing).
    #[inline]
    pub fn close_value(&self) -> Option<f64> {
        self.close.is_finite().then_some(self.close)
    }
}

/// Indicator periods used by `compute_indicators`.
pub mod periods {
    pub const SMA_SHORT: usize = 20;
    pub const SMA_MEDIUM: usize = 50;
    pub const SMA_LONG: usize = 200;
    pub const RSI: usize = 14;
    pub const RSI_MA: usize = 14;
    pub const MACD_FAST: usize = 12;
    pub const MACD_SLOW: usize = 26;
    pub const MACD_SIGNAL: usize = 9;
    pub const BOLLINGER: usize = 20;
    pub const BOLLINGER_STD: f64 = 2.0;
    pub const STOCH_K: usize = 14;
    pub const STOCH_D: usize = 3;
    pub const WILLIAMS_R: usize = 14;
    pub const CCI: usize = 20;
    pub const ATR: usize = 14;
    pub const MFI: usize = 14;
}

#[inline]
fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Compute indicator snapshots for every bar.
///
/// Bars must already be in ascending timestamp order; the engine does not
/// sort. An empty or malformed sequence yields an empty result.
pub fn compute_indicators(bars: &[Bar]) -> Vec<IndicatorSnapshot> {
    if bars.is_empty() {
        return Vec::new();
    }
    if let Err(defect) = validate_bars(bars) {
        tracing::warn!(?defect, bars = bars.len(), "rejecting malformed bar sequence");
        return Vec::new();
    }

    match build_snapshots(&OhlcvData::from_bars(bars)) {
        Ok(snapshots) => {
            tracing::debug!(bars = snapshots.len(), "computed indicator snapshots");
            snapshots
        }
        Err(err) => {
            tracing::warn!(error = %err, "indicator computation failed");
            Vec::new()
        }
    }
}

fn build_snapshots(data: &OhlcvData) -> Result<Vec<IndicatorSnapshot>> {
    use periods::*;

    let close = &data.close;
    let (high, low, volume) = (&data.high, &data.low, &data.volume);

    let sma_20 = sma(close, SMA_SHORT)?;
    let sma_50 = sma(close, SMA_MEDIUM)?;
    let sma_200 = sma(close, SMA_LONG)?;
    let ema_20 = ema(close, SMA_SHORT)?;
    let ema_50 = ema(close, SMA_MEDIUM)?;
    let ema_200 = ema(close, SMA_LONG)?;
    let rsi_values = rsi(close, RSI)?;
    // undefined until RSI_MA defined RSI values exist
    let rsi_ma = windowed(&rsi_values, RSI_MA, |w| w.iter().sum::<f64>() / w.len() as f64);
    let macd_values = macd(close, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;
    let bands = bollinger_bands(close, BOLLINGER, BOLLINGER_STD)?;
    let stoch = stochastic(high, low, close, STOCH_K, STOCH_D)?;
    let williams = williams_r(high, low, close, WILLIAMS_R)?;
    let cci_values = cci(high, low, close, CCI)?;
    let atr_values = atr(high, low, close, ATR)?;
    let obv_values = obv(close, volume)?;
    let mfi_values = mfi(high, low, close, volume, MFI)?;

    let snapshots = (0..data.len())
        .map(|i| IndicatorSnapshot {
            index: i,
            timestamp: data.timestamps[i],
            close: close[i],
            sma_20: defined(sma_20[i]),
            sma_50: defined(sma_50[i]),
            sma_200: defined(sma_200[i]),
            ema_20: defined(ema_20[i]),
            ema_50: defined(ema_50[i]),
            ema_200: defined(ema_200[i]),
            rsi: defined(rsi_values[i]),
            rsi_ma: defined(rsi_ma[i]),
            macd_line: defined(macd_values.macd_line[i]),
            macd_signal: defined(macd_values.signal_line[i]),
            macd_hist: defined(macd_values.histogram[i]),
            bb_high: defined(bands.upper[i]),
            bb_mid: defined(bands.middle[i]),
            bb_low: defined(bands.lower[i]),
            bb_width: defined(bands.bandwidth[i]),
            bb_position: defined(bands.percent_b[i]),
            stoch_k: defined(stoch.k[i]),
            stoch_d: defined(stoch.d[i]),
            williams_r: defined(williams[i]),
            cci: defined(cci_values[i]),
            atr: defined(atr_values[i]),
            obv: defined(obv_values[i]),
            mfi: defined(mfi_values[i]),
        })
        .collect();

    Ok(snapshots)
}

/// The last two snapshots as `(latest, previous)`, the pair the scorer needs.
pub fn latest_pair(snapshots: &[IndicatorSnapshot]) -> Option<(&IndicatorSnapshot, &IndicatorSnapshot)> {
    match snapshots {
        [.., previous, latest] => Some((latest, previous)),
        [only] => Some((only, only)),
        [] => None,
    }
}
