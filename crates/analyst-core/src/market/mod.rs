//! Market data providers and price series types

pub mod series;
pub mod yahoo;

pub use series::{Bar, PriceSeries};
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implementations fetch historical daily bars for a ticker. The pipeline
/// consumes closing price and volume only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch one year of daily bars for a symbol, oldest first
    async fn daily_history(&self, symbol: &str) -> Result<Vec<Bar>>;
}
