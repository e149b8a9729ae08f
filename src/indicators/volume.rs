//! Volume indicators: OBV, MFI.

use std::cmp::Ordering;

use super::momentum::strength_index;
use super::rolling::{check_columns, check_period};
use crate::core::Result;

/// On Balance Volume.
///
/// Starts at the first bar's volume; every later bar adds or subtracts its
/// volume according to the close direction.
pub fn obv(close: &[f64], volume: &[f64]) -> Result<Vec<f64>> {
    check_columns(close, &[volume])?;

    let Some(&first) = volume.first() else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(close.len());
    let mut total = first;
    out.push(total);
    for (pair, &vol) in close.windows(2).zip(&volume[1..]) {
        total += match pair[1].partial_cmp(&pair[0]) {
            Some(Ordering::Greater) => vol,
            Some(Ordering::Less) => -vol,
            _ => 0.0,
        };
        out.push(total);
    }
    Ok(out)
}

/// Money Flow Index: RSI of typical-price money flow.
///
/// Needs `period` typical-price changes, so the first value sits at index
/// `period`. A window without any flow reads 50.
pub fn mfi(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Result<Vec<f64>> {
    check_columns(close, &[high, low, volume])?;
    check_period("MFI", period)?;

    let n = close.len();
    let mut out = vec![f64::NAN; n];
    if period >= n {
        return Ok(out);
    }

    let typical: Vec<f64> = (0..n).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();
    // signed money flow of each change; index j covers bar j + 1
    let flows: Vec<(f64, f64)> = (1..n)
        .map(|i| {
            let raw = typical[i] * volume[i];
            match typical[i].partial_cmp(&typical[i - 1]) {
                Some(Ordering::Greater) => (raw, 0.0),
                Some(Ordering::Less) => (0.0, raw),
                _ => (0.0, 0.0),
            }
        })
        .collect();

    for (offset, window) in flows.windows(period).enumerate() {
        let (positive, negative) = window
            .iter()
            .fold((0.0, 0.0), |(p, q), &(up, down)| (p + up, q + down));
        out[offset + period] = if positive == 0.0 && negative == 0.0 {
            50.0
        } else {
            strength_index(positive, negative)
        };
    }

    Ok(out)
}
