//! News search client for recent market headlines

use crate::config::AnalystConfig;
use crate::error::{AnalystError, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// One news article about a ticker
///
/// Ephemeral: articles are fetched per analysis and never deduplicated
/// across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Article headline
    pub title: String,
    /// Publishing outlet, derived from the article URL host when the API
    /// does not carry one
    pub source: String,
    /// Article URL
    pub url: String,
    /// Publish date as reported by the search API
    pub published_date: Option<String>,
    /// Raw article content
    pub content: String,
    /// Optional LLM-generated bullet summary
    pub summary: Option<String>,
}

/// Trait for news/search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Search for recent articles matching a free-text query
    async fn search_news(&self, query: &str, max_results: usize) -> Result<Vec<NewsItem>>;
}

/// Tavily search API client with rate limiting
pub struct TavilyClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl TavilyClient {
    /// Create a new Tavily client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Tavily API key
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request HTTP timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Build a client from configuration
    ///
    /// Fails when no Tavily API key is configured.
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        let api_key = config.tavily_api_key.clone().ok_or_else(|| {
            AnalystError::Config("TAVILY_API_KEY is required for news fetching".to_string())
        })?;
        Self::new(api_key, config.news_rate_limit, config.request_timeout)
    }
}

#[async_trait]
impl NewsProvider for TavilyClient {
    async fn search_news(&self, query: &str, max_results: usize) -> Result<Vec<NewsItem>> {
        self.rate_limiter.until_ready().await;

        let request = TavilySearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
            include_raw_content: true,
        };

        let response = self
            .client
            .post(TAVILY_SEARCH_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalystError::NewsApi(format!("Tavily request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::NewsApi(format!(
                "Tavily API error {status}: {body}"
            )));
        }

        let parsed = response
            .json::<TavilySearchResponse>()
            .await
            .map_err(|e| AnalystError::NewsApi(format!("Failed to parse Tavily response: {e}")))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(NewsItem::from)
            .collect())
    }
}

impl From<TavilySearchResult> for NewsItem {
    fn from(result: TavilySearchResult) -> Self {
        let source = source_from_url(&result.url);
        let content = result.raw_content.unwrap_or(result.content);
        Self {
            title: if result.title.is_empty() {
                "Untitled Article".to_string()
            } else {
                result.title
            },
            source,
            url: result.url,
            published_date: result.published_date,
            content,
            summary: None,
        }
    }
}

/// Derive a display source from an article URL ("Unknown" when unparseable)
fn source_from_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = without_scheme.split('/').next().unwrap_or("");
    if host.is_empty() {
        "Unknown".to_string()
    } else {
        host.strip_prefix("www.").unwrap_or(host).to_string()
    }
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilySearchResult>,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tavily_client_creation() {
        let client = TavilyClient::new("test_key", 60, Duration::from_secs(30)).unwrap();
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = AnalystConfig::default();
        assert!(TavilyClient::from_config(&config).is_err());

        let config = AnalystConfig {
            tavily_api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(TavilyClient::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_request_timeout_is_enforced() {
        // Unroutable address (RFC 5737 TEST-NET); the connect attempt must
        // be cut off by the configured timeout rather than hang
        let client = TavilyClient::new("key", 60, Duration::from_millis(50)).unwrap();
        let request = TavilySearchRequest {
            api_key: &client.api_key,
            query: "AAPL stock news",
            max_results: 3,
            include_raw_content: true,
        };

        let started = std::time::Instant::now();
        let result = client
            .client
            .post("http://192.0.2.1/search")
            .json(&request)
            .send()
            .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_source_from_url() {
        assert_eq!(source_from_url("https://www.reuters.com/a/b"), "reuters.com");
        assert_eq!(source_from_url("http://finance.example.org"), "finance.example.org");
        assert_eq!(source_from_url(""), "Unknown");
    }

    #[test]
    fn test_result_conversion_prefers_raw_content() {
        let result = TavilySearchResult {
            title: String::new(),
            url: "https://news.example.com/story".to_string(),
            content: "snippet".to_string(),
            raw_content: Some("full text".to_string()),
            published_date: Some("2026-08-20".to_string()),
        };

        let item = NewsItem::from(result);
        assert_eq!(item.title, "Untitled Article");
        assert_eq!(item.source, "news.example.com");
        assert_eq!(item.content, "full text");
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "results": [
                {"title": "Chip rally continues", "url": "https://www.ft.com/x",
                 "content": "short", "raw_content": null, "published_date": "2026-08-21"}
            ]
        }"#;
        let parsed: TavilySearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].title, "Chip rally continues");
    }
}
