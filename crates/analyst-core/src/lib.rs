//! Stock analysis pipeline
//!
//! This crate implements a single-shot analysis pipeline for one ticker:
//!
//! - Market data fetching (Yahoo Finance, one year of daily bars)
//! - Technical indicators (SMA, RSI, MACD, rolling volatility)
//! - Recent news retrieval with optional LLM summaries
//! - LLM-generated narrative with a Buy/Hold/Sell verdict
//! - Heuristic parsing of the model's free-text reply
//!
//! # Architecture
//!
//! The orchestrator (`MarketAnalyst`) takes every external service as an
//! injected trait object, so tests substitute fakes for the market data,
//! news, and LLM providers. Price-data failure is fatal to a request;
//! news and narrative failures degrade to markers on the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_core::{AnalystConfig, MarketAnalyst};
//! use analyst_core::market::YahooFinanceClient;
//! use analyst_core::news::TavilyClient;
//! use analyst_llm::providers::GeminiProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalystConfig::builder().with_env_api_keys().build()?;
//!     let analyst = MarketAnalyst::new(
//!         Arc::new(YahooFinanceClient::new()),
//!         Arc::new(TavilyClient::from_config(&config)?),
//!         Arc::new(GeminiProvider::from_env()?),
//!         config,
//!     );
//!
//!     let result = analyst.analyze("NVDA").await?;
//!     println!("{:?}", result.verdict);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market;
pub mod narrative;
pub mod news;
pub mod parser;
pub mod prompts;

// Re-export main types for convenience
pub use config::AnalystConfig;
pub use engine::{AnalysisResult, MarketAnalyst, PriceTargets, Verdict};
pub use error::{AnalystError, Result};
pub use indicators::IndicatorSet;
pub use market::{Bar, MarketDataProvider, PriceSeries, YahooFinanceClient};
pub use news::{NewsItem, NewsProvider, TavilyClient};
