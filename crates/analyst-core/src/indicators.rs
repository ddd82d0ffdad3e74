//! Technical indicator calculations
//!
//! All functions here are pure and deterministic over a closing-price
//! series, oldest first. A series shorter than the requested window is an
//! `InsufficientHistory` error, never a silent NaN.

use crate::error::{AnalystError, Result};
use crate::market::PriceSeries;
use serde::{Deserialize, Serialize};

/// Short simple-moving-average window (trading days)
pub const SMA_SHORT: usize = 50;
/// Long simple-moving-average window (trading days)
pub const SMA_LONG: usize = 200;
/// RSI lookback period
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA span
pub const MACD_FAST: usize = 12;
/// MACD slow EMA span
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA span
pub const MACD_SIGNAL: usize = 9;
/// Rolling-volatility window (daily returns)
pub const VOLATILITY_WINDOW: usize = 20;
/// Average-volume window (trading days)
pub const VOLUME_WINDOW: usize = 50;

/// Latest value of every indicator the narrative prompt embeds
///
/// Recomputed from the price series on every analysis request; never
/// cached or persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Latest closing price
    pub last_price: f64,
    /// Latest 50-day simple moving average
    pub sma_50: f64,
    /// Latest 200-day simple moving average
    pub sma_200: f64,
    /// Latest RSI(14)
    pub rsi_14: f64,
    /// Latest MACD line value (EMA12 - EMA26)
    pub macd: f64,
    /// Latest MACD signal line value (EMA9 of the MACD line)
    pub macd_signal: f64,
    /// 20-day volatility of daily returns, in percent
    pub volatility_pct: f64,
    /// 50-day average trading volume
    pub avg_volume: f64,
}

impl IndicatorSet {
    /// Compute the full indicator snapshot for a price series
    ///
    /// The 200-day SMA is the binding constraint: a series with fewer than
    /// 200 trading days (roughly ten months) fails here.
    pub fn compute(series: &PriceSeries) -> Result<Self> {
        let closes = series.closes();
        let volumes = series.volumes();
        let (macd, macd_signal) = latest_macd(&closes)?;

        Ok(Self {
            last_price: series.latest_close(),
            sma_50: latest_sma(&closes, SMA_SHORT)?,
            sma_200: latest_sma(&closes, SMA_LONG)?,
            rsi_14: rsi(&closes, RSI_PERIOD)?,
            macd,
            macd_signal,
            volatility_pct: volatility(&closes, VOLATILITY_WINDOW)?,
            avg_volume: latest_mean(&volumes, VOLUME_WINDOW)?,
        })
    }
}

/// Trailing simple moving average over the full series
///
/// The first `window - 1` points have no full window and are `None`.
pub fn sma_series(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Latest trailing simple moving average
pub fn latest_sma(values: &[f64], window: usize) -> Result<f64> {
    latest_mean(values, window)
}

/// Mean of the last `window` values
pub fn latest_mean(values: &[f64], window: usize) -> Result<f64> {
    if window == 0 || values.len() < window {
        return Err(AnalystError::InsufficientHistory {
            required: window,
            available: values.len(),
        });
    }
    let slice = &values[values.len() - window..];
    Ok(slice.iter().sum::<f64>() / window as f64)
}

/// Exponential moving average with `alpha = 2 / (span + 1)`
///
/// Seeded at the first value, so every point is defined (the recursive
/// `ewm(adjust=False)` formulation).
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// Relative Strength Index over trailing `period` one-day differences
///
/// Average gain and average loss are plain rolling means. When the average
/// loss over the window is zero the index saturates to exactly 100.0 - this
/// covers both the all-gains case and a completely flat window, and keeps
/// the result inside [0, 100] without dividing by zero.
pub fn rsi(values: &[f64], period: usize) -> Result<f64> {
    if period == 0 || values.len() < period + 1 {
        return Err(AnalystError::InsufficientHistory {
            required: period + 1,
            available: values.len(),
        });
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len() - period..];

    let avg_gain: f64 = window.iter().filter(|&&d| d > 0.0).sum::<f64>() / period as f64;
    let avg_loss: f64 = -window.iter().filter(|&&d| d < 0.0).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

/// MACD line and signal line over the full series
///
/// The MACD line is the fast EMA minus the slow EMA at every point by
/// construction; the signal line is an EMA of the MACD line. Requires at
/// least `MACD_SLOW` points.
pub fn macd_series(values: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if values.len() < MACD_SLOW {
        return Err(AnalystError::InsufficientHistory {
            required: MACD_SLOW,
            available: values.len(),
        });
    }

    let fast = ema_series(values, MACD_FAST);
    let slow = ema_series(values, MACD_SLOW);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema_series(&macd_line, MACD_SIGNAL);
    Ok((macd_line, signal_line))
}

/// Latest MACD and signal values
pub fn latest_macd(values: &[f64]) -> Result<(f64, f64)> {
    let (macd_line, signal_line) = macd_series(values)?;
    // macd_series guarantees non-empty output
    Ok((macd_line[macd_line.len() - 1], signal_line[signal_line.len() - 1]))
}

/// Rolling volatility: sample standard deviation (ddof = 1) of daily
/// percentage returns over the trailing window, in percent
pub fn volatility(values: &[f64], window: usize) -> Result<f64> {
    if window < 2 || values.len() < window + 1 {
        return Err(AnalystError::InsufficientHistory {
            required: window + 1,
            available: values.len(),
        });
    }

    let returns: Vec<f64> = values.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let slice = &returns[returns.len() - window..];
    let mean = slice.iter().sum::<f64>() / window as f64;
    let variance =
        slice.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
    Ok(variance.sqrt() * 100.0)
}
