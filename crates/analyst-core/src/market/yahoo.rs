//! Yahoo Finance API client

use crate::error::{AnalystError, Result};
use crate::market::{Bar, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// One year of trading history, fetched for every analysis request
const HISTORY_DAYS: i64 = 365;

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Get historical daily quotes for a symbol between two instants
    async fn get_quote_history(
        &self,
        symbol: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Bar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalystError::MarketData(e.to_string()))?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| AnalystError::MarketData(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| AnalystError::MarketData(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Bar {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<Bar>> {
        let end = OffsetDateTime::now_utc();
        let start = end - time::Duration::days(HISTORY_DAYS);
        self.get_quote_history(symbol, start, end).await
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooFinanceClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}
