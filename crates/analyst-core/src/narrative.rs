//! LLM-backed narrative generation
//!
//! Turns computed indicators and headlines into a structured analysis
//! narrative, and decides whether news context is worth fetching at all.

use crate::config::AnalystConfig;
use crate::error::Result;
use crate::indicators::IndicatorSet;
use crate::news::NewsItem;
use crate::prompts;
use analyst_llm::{CompletionRequest, LLMProvider, Message};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Token cap for the yes/no news decision; the answer is one word
const DECISION_MAX_TOKENS: usize = 10;

/// Token cap for per-article bullet summaries
const SUMMARY_MAX_TOKENS: usize = 300;

/// Generates analysis narratives through an LLM provider
pub struct NarrativeGenerator {
    provider: Arc<dyn LLMProvider>,
    config: Arc<AnalystConfig>,
}

impl NarrativeGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: Arc<AnalystConfig>) -> Self {
        Self { provider, config }
    }

    /// Generate the full analysis narrative for a ticker
    ///
    /// The prompt embeds every computed metric plus up to the configured
    /// number of headlines, and instructs the model to answer in the
    /// strict Recommendation/Reasons/Targets format the parser expects.
    pub async fn generate_analysis(
        &self,
        ticker: &str,
        indicators: &IndicatorSet,
        news: &[NewsItem],
    ) -> Result<String> {
        let prompt = prompts::analysis_prompt(ticker, indicators, news)?;
        debug!(ticker, prompt_len = prompt.len(), "generating analysis");

        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(prompt))
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_output_tokens)
            .build();

        let response = self.provider.complete(request).await?;
        Ok(response.text().to_string())
    }

    /// Summarize a single article into bullet points
    ///
    /// Summaries are best-effort: a provider failure is logged and the
    /// article keeps flowing through the pipeline without one.
    pub async fn summarize_article(&self, item: &NewsItem) -> Option<String> {
        let content = if item.content.is_empty() {
            &item.title
        } else {
            &item.content
        };

        let prompt = match prompts::summary_prompt(content, self.config.summary_max_chars) {
            Ok(prompt) => prompt,
            Err(error) => {
                warn!(title = %item.title, %error, "failed to render summary prompt");
                return None;
            }
        };

        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(prompt))
            .temperature(self.config.temperature)
            .max_tokens(SUMMARY_MAX_TOKENS)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => Some(response.text().to_string()),
            Err(error) => {
                warn!(title = %item.title, %error, "article summary failed");
                None
            }
        }
    }
}

/// Decides whether news context should be fetched for an analysis
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsPolicy: Send + Sync {
    /// Whether news would improve the recommendation for these indicators
    async fn wants_news(&self, indicators: &IndicatorSet) -> bool;
}

/// Asks the model itself whether news context is needed
///
/// The model is prompted for a bare Yes/No; anything that does not start
/// with "yes" (case-insensitive) counts as no. Provider failures default
/// to wanting news, the conservative choice.
pub struct ModelNewsPolicy {
    provider: Arc<dyn LLMProvider>,
    config: Arc<AnalystConfig>,
}

impl ModelNewsPolicy {
    pub fn new(provider: Arc<dyn LLMProvider>, config: Arc<AnalystConfig>) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl NewsPolicy for ModelNewsPolicy {
    async fn wants_news(&self, indicators: &IndicatorSet) -> bool {
        let prompt = match prompts::needs_news_prompt(indicators) {
            Ok(prompt) => prompt,
            Err(error) => {
                warn!(%error, "failed to render news decision prompt");
                return true;
            }
        };

        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(prompt))
            .temperature(self.config.temperature)
            .max_tokens(DECISION_MAX_TOKENS)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => {
                let answer = response.text().trim().to_lowercase();
                debug!(%answer, "news decision");
                answer.starts_with("yes")
            }
            Err(error) => {
                warn!(%error, "news decision failed, defaulting to fetch");
                true
            }
        }
    }
}

/// Rule-based news decision that never calls the model
///
/// Skips news only when the price sits on the same side of both moving
/// averages, i.e. the trend is unambiguous.
pub struct TrendNewsPolicy;

#[async_trait]
impl NewsPolicy for TrendNewsPolicy {
    async fn wants_news(&self, indicators: &IndicatorSet) -> bool {
        let above_both =
            indicators.last_price > indicators.sma_50 && indicators.last_price > indicators.sma_200;
        let below_both =
            indicators.last_price < indicators.sma_50 && indicators.last_price < indicators.sma_200;
        !(above_both || below_both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_llm::{
        CompletionResponse, LLMError, Message, StopReason, TokenUsage,
        Result as LLMResult,
    };

    mockall::mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> LLMResult<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    fn sample_indicators() -> IndicatorSet {
        IndicatorSet {
            last_price: 190.0,
            sma_50: 180.0,
            sma_200: 170.0,
            rsi_14: 55.0,
            macd: 1.0,
            macd_signal: 0.8,
            volatility_pct: 2.0,
            avg_volume: 1_000_000.0,
        }
    }

    fn config() -> Arc<AnalystConfig> {
        Arc::new(AnalystConfig::default())
    }

    #[tokio::test]
    async fn test_generate_analysis_uses_config_sampling() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|request| {
                request.temperature == Some(0.3) && request.max_tokens == 1000
            })
            .returning(|_| Ok(response("Recommendation: Buy")));

        let generator = NarrativeGenerator::new(Arc::new(provider), config());
        let narrative = generator
            .generate_analysis("AAPL", &sample_indicators(), &[])
            .await
            .unwrap();
        assert_eq!(narrative, "Recommendation: Buy");
    }

    #[tokio::test]
    async fn test_summarize_article_failure_is_none() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::RequestFailed("boom".to_string())));

        let generator = NarrativeGenerator::new(Arc::new(provider), config());
        let item = NewsItem {
            title: "Earnings".to_string(),
            source: "reuters.com".to_string(),
            url: String::new(),
            published_date: None,
            content: "Full text".to_string(),
            summary: None,
        };
        assert!(generator.summarize_article(&item).await.is_none());
    }

    #[tokio::test]
    async fn test_model_policy_yes_prefix() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Ok(response("Yes, recent news would help.")));

        let policy = ModelNewsPolicy::new(Arc::new(provider), config());
        assert!(policy.wants_news(&sample_indicators()).await);
    }

    #[tokio::test]
    async fn test_model_policy_no() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Ok(response("No.")));

        let policy = ModelNewsPolicy::new(Arc::new(provider), config());
        assert!(!policy.wants_news(&sample_indicators()).await);
    }

    #[tokio::test]
    async fn test_model_policy_defaults_to_true_on_error() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".to_string())));

        let policy = ModelNewsPolicy::new(Arc::new(provider), config());
        assert!(policy.wants_news(&sample_indicators()).await);
    }

    #[tokio::test]
    async fn test_trend_policy() {
        // Price above both averages: trend is clear, skip news
        assert!(!TrendNewsPolicy.wants_news(&sample_indicators()).await);

        let mut mixed = sample_indicators();
        mixed.last_price = 175.0;
        assert!(TrendNewsPolicy.wants_news(&mixed).await);
    }
}
