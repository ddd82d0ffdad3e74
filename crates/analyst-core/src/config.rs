//! Configuration for analysis operations

use crate::error::{AnalystError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Model identifier passed to the LLM provider
    pub model: String,

    /// Sampling temperature for narrative generation
    pub temperature: f32,

    /// Output-length cap for narrative generation (tokens)
    pub max_output_tokens: usize,

    /// Maximum number of news articles fetched per analysis
    pub max_news_items: usize,

    /// Article content is truncated to this many characters before summarization
    pub summary_max_chars: usize,

    /// News API rate limit (requests per minute)
    pub news_rate_limit: u32,

    /// Request timeout duration for HTTP clients
    pub request_timeout: Duration,

    /// Tavily search API key (optional)
    pub tavily_api_key: Option<String>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.3,
            max_output_tokens: 1000,
            max_news_items: 3,
            summary_max_chars: 3000,
            news_rate_limit: 60,
            request_timeout: Duration::from_secs(30),
            tavily_api_key: None,
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load the Tavily API key from the environment
    pub fn with_env_api_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.tavily_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AnalystError::Config(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }

        if self.max_output_tokens == 0 {
            return Err(AnalystError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if self.max_news_items == 0 {
            return Err(AnalystError::Config(
                "max_news_items must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<usize>,
    max_news_items: Option<usize>,
    summary_max_chars: Option<usize>,
    news_rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
    tavily_api_key: Option<String>,
}

impl AnalystConfigBuilder {
    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output-length cap
    pub fn max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set the maximum number of news articles per analysis
    pub fn max_news_items(mut self, items: usize) -> Self {
        self.max_news_items = Some(items);
        self
    }

    /// Set the summarization truncation length
    pub fn summary_max_chars(mut self, chars: usize) -> Self {
        self.summary_max_chars = Some(chars);
        self
    }

    /// Set the news API rate limit (requests per minute)
    pub fn news_rate_limit(mut self, per_minute: u32) -> Self {
        self.news_rate_limit = Some(per_minute);
        self
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the Tavily API key
    pub fn tavily_api_key(mut self, key: impl Into<String>) -> Self {
        self.tavily_api_key = Some(key.into());
        self
    }

    /// Load the Tavily API key from the environment
    pub fn with_env_api_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.tavily_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_output_tokens: self.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            max_news_items: self.max_news_items.unwrap_or(defaults.max_news_items),
            summary_max_chars: self.summary_max_chars.unwrap_or(defaults.summary_max_chars),
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            tavily_api_key: self.tavily_api_key,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalystConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_news_items, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalystConfig::builder()
            .model("gemini-1.5-pro")
            .temperature(0.4)
            .max_output_tokens(800)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.temperature, 0.4);
        assert_eq!(config.max_output_tokens, 800);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let config = AnalystConfig {
            temperature: 3.5,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_news_items() {
        let result = AnalystConfig::builder().max_news_items(0).build();
        assert!(result.is_err());
    }
}
