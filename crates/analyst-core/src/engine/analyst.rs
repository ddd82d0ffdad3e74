//! End-to-end analysis pipeline

use crate::config::AnalystConfig;
use crate::engine::result::AnalysisResult;
use crate::error::Result;
use crate::indicators::IndicatorSet;
use crate::market::{MarketDataProvider, PriceSeries};
use crate::narrative::{ModelNewsPolicy, NarrativeGenerator, NewsPolicy};
use crate::news::{NewsItem, NewsProvider};
use crate::parser;
use analyst_llm::LLMProvider;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Orchestrates a full ticker analysis
///
/// Failure handling is two-tier: missing or insufficient market data is
/// fatal and surfaces as an `Err`, while news and narrative failures
/// degrade the result in place (`news_error` / `analysis_error`).
pub struct MarketAnalyst {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    narrative: NarrativeGenerator,
    policy: Arc<dyn NewsPolicy>,
    config: Arc<AnalystConfig>,
}

impl MarketAnalyst {
    /// Create an analyst with the default model-driven news policy
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        llm: Arc<dyn LLMProvider>,
        config: AnalystConfig,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            market,
            news,
            narrative: NarrativeGenerator::new(Arc::clone(&llm), Arc::clone(&config)),
            policy: Arc::new(ModelNewsPolicy::new(llm, Arc::clone(&config))),
            config,
        }
    }

    /// Replace the news decision policy
    pub fn with_news_policy(mut self, policy: Arc<dyn NewsPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Run the full pipeline for a ticker
    #[instrument(skip(self))]
    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisResult> {
        let mut reasoning = Vec::new();

        reasoning.push(format!("Step 1: Fetching 1y history for {ticker}"));
        let bars = self.market.daily_history(ticker).await?;
        let series = PriceSeries::from_bars(ticker, bars)?;

        let indicators = IndicatorSet::compute(&series)?;
        reasoning.push(format!(
            "  -> Got price ${:.2}, SMA50 ${:.2}, SMA200 ${:.2}",
            indicators.last_price, indicators.sma_50, indicators.sma_200
        ));
        reasoning.push("Step 2: Indicators computed".to_string());

        reasoning.push("Step 3: Deciding whether news is needed".to_string());
        let need_news = self.policy.wants_news(&indicators).await;
        reasoning.push(format!(
            "  -> Decision: {}",
            if need_news { "Yes" } else { "No" }
        ));

        let (news, news_error) = if need_news {
            reasoning.push(format!(
                "Step 4: Fetching top-{} news articles",
                self.config.max_news_items
            ));
            match self.fetch_news(ticker).await {
                Ok(news) => {
                    reasoning.push(format!("  -> Received {} articles", news.len()));
                    (news, None)
                }
                Err(error) => {
                    warn!(ticker, %error, "news fetch failed, continuing without news");
                    reasoning.push(format!("  -> News fetch failed: {error}"));
                    (Vec::new(), Some(error.to_string()))
                }
            }
        } else {
            reasoning.push("Step 4: Skipping news fetch".to_string());
            (Vec::new(), None)
        };

        reasoning.push("Step 5: Generating recommendation".to_string());
        let (verdict, analysis_error) = match self
            .narrative
            .generate_analysis(ticker, &indicators, &news)
            .await
        {
            Ok(narrative) => {
                let verdict = parser::parse_analysis(&narrative);
                reasoning.push(format!("  -> Recommendation: {}", verdict.recommendation));
                (Some(verdict), None)
            }
            Err(error) => {
                warn!(ticker, %error, "narrative generation failed");
                reasoning.push(format!("  -> Analysis failed: {error}"));
                (None, Some(error.to_string()))
            }
        };

        info!(
            ticker,
            recommendation = verdict
                .as_ref()
                .map_or("N/A", |verdict| verdict.recommendation.as_str()),
            "analysis complete"
        );

        Ok(AnalysisResult {
            ticker: ticker.to_string(),
            price: indicators.last_price,
            indicators,
            news,
            news_error,
            verdict,
            analysis_error,
            price_history: series.closes(),
            sma_50_history: series.sma_series(crate::indicators::SMA_SHORT),
            sma_200_history: series.sma_series(crate::indicators::SMA_LONG),
            reasoning,
            generated_at: Utc::now(),
        })
    }

    /// Fetch and summarize up to the configured number of articles
    async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let query = format!("{ticker} stock news");
        let mut articles = self
            .news
            .search_news(&query, self.config.max_news_items)
            .await?;
        articles.truncate(self.config.max_news_items);

        for article in &mut articles {
            article.summary = self.narrative.summarize_article(article).await;
        }
        Ok(articles)
    }
}
