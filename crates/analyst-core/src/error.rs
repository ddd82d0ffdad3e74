//! Error types for analysis operations

use thiserror::Error;

/// Analysis pipeline errors
#[derive(Debug, Error)]
pub enum AnalystError {
    /// No historical price data exists for the ticker (fatal to the request)
    #[error("No historical data found for {symbol}")]
    NoData { symbol: String },

    /// Price series is too short for an indicator window
    #[error("Insufficient history: need {required} points, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// Market data provider failed
    #[error("Market data error: {0}")]
    MarketData(String),

    /// News/search provider failed
    #[error("News API error: {0}")]
    NewsApi(String),

    /// Language model invocation failed
    #[error("LLM error: {0}")]
    Llm(#[from] analyst_llm::LLMError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Prompt template error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalystError>;
