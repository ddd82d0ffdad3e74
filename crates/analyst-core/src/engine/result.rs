//! Analysis output types

use crate::indicators::IndicatorSet;
use crate::news::NewsItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete result of a single ticker analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ticker symbol that was analyzed
    pub ticker: String,

    /// Latest closing price
    pub price: f64,

    /// Computed technical indicators
    pub indicators: IndicatorSet,

    /// News articles that informed the analysis (possibly empty)
    pub news: Vec<NewsItem>,

    /// Error message if news retrieval failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_error: Option<String>,

    /// Parsed verdict, absent when narrative generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,

    /// Error message if narrative generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,

    /// Closing-price history over the fetched year, oldest first
    pub price_history: Vec<f64>,

    /// 50-day SMA at each point, `None` during warmup
    pub sma_50_history: Vec<Option<f64>>,

    /// 200-day SMA at each point, `None` during warmup
    pub sma_200_history: Vec<Option<f64>>,

    /// Step-by-step log of what the analysis did
    pub reasoning: Vec<String>,

    /// When the analysis completed
    pub generated_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Recommendation text, "N/A" when no verdict was produced
    pub fn recommendation(&self) -> &str {
        self.verdict
            .as_ref()
            .map_or("N/A", |verdict| verdict.recommendation.as_str())
    }
}

/// Structured verdict parsed from the narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Buy/Hold/Sell recommendation
    pub recommendation: String,

    /// Up to three key reasons supporting the recommendation
    pub key_points: Vec<String>,

    /// Conservative and aggressive price targets
    pub targets: PriceTargets,

    /// Unparsed narrative text as the model produced it
    pub raw: String,
}

/// Price targets extracted from the narrative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTargets {
    /// Conservative target, as the model wrote it (after the dollar sign)
    pub conservative: Option<String>,

    /// Aggressive target, as the model wrote it
    pub aggressive: Option<String>,
}
