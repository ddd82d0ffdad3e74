//! Price series types

use crate::error::{AnalystError, Result};
use crate::indicators;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily bar for a ticker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: u64,
}

/// Ordered daily price history for one ticker
///
/// Immutable once constructed; construction fails on an empty history so
/// every series is guaranteed to have a latest close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from fetched bars
    ///
    /// Returns `AnalystError::NoData` when the provider returned an empty
    /// history (e.g., a delisted symbol).
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(AnalystError::NoData { symbol });
        }
        Ok(Self { symbol, bars })
    }

    /// Ticker symbol this series belongs to
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All bars, oldest first
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of trading days in the series
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series is empty (never true for a constructed series)
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Trading volumes as floats, oldest first
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Latest closing price
    pub fn latest_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }

    /// Timestamp of the latest bar
    pub fn latest_timestamp(&self) -> DateTime<Utc> {
        self.bars[self.bars.len() - 1].timestamp
    }

    /// Trailing SMA series for a window; `None` for the first `window - 1` points
    pub fn sma_series(&self, window: usize) -> Vec<Option<f64>> {
        indicators::sma_series(&self.closes(), window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> Bar {
        Bar {
            timestamp: Utc::now(),
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_empty_history_is_no_data() {
        let err = PriceSeries::from_bars("GONE", Vec::new()).unwrap_err();
        assert!(matches!(err, AnalystError::NoData { symbol } if symbol == "GONE"));
    }

    #[test]
    fn test_accessors() {
        let series =
            PriceSeries::from_bars("AAPL", vec![bar(10.0), bar(11.0), bar(12.0)]).unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest_close(), 12.0);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }
}
