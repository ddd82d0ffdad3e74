//! Prompt templates for the narrative generator
//!
//! Templates are deterministic: all numeric formatting happens in Rust
//! before rendering, so the templates only interpolate ready-made strings.

use crate::error::Result;
use crate::indicators::IndicatorSet;
use crate::news::NewsItem;
use minijinja::{Environment, context};

const ANALYSIS_TEMPLATE: &str = "\
Stock Analysis Report for {{ ticker }}:

Current Price: ${{ price }}
50-Day SMA: ${{ sma_50 }}
200-Day SMA: ${{ sma_200 }}
RSI (14): {{ rsi }}
MACD: {{ macd }}
Signal Line: {{ macd_signal }}
Volatility (20d): {{ volatility }}%
Avg. Volume (50d): {{ avg_volume }}
{% if news %}
Recent News:
{% for item in news %}{{ loop.index }}. {{ item.title }} ({{ item.source }})
{% endfor %}{% endif %}
Provide:
1. Recommendation (Buy/Hold/Sell)
2. 3 Key Reasons (bullet points)
3. Price Targets (Conservative/Aggressive)

Format exactly as:
Recommendation: [Your Verdict]
Reasons:
- Reason 1
- Reason 2
- Reason 3
Targets:
- Conservative: $X
- Aggressive: $Y
";

const NEEDS_NEWS_TEMPLATE: &str = "\
We have the following data for a stock:
- Current Price: ${{ price }}
- 50-Day SMA: ${{ sma_50 }}
- 200-Day SMA: ${{ sma_200 }}

Question: Do you need recent news articles to give a better
Buy/Hold/Sell recommendation? Answer ONLY \"Yes\" or \"No\".
";

const SUMMARY_TEMPLATE: &str = "\
Summarize this article in 3-5 concise bullet points:
{{ content }}

Format strictly as:
- Point 1
- Point 2
- Point 3
";

/// Render the full analysis prompt for a ticker
pub fn analysis_prompt(
    ticker: &str,
    indicators: &IndicatorSet,
    news: &[NewsItem],
) -> Result<String> {
    let news_context: Vec<_> = news
        .iter()
        .map(|item| {
            context! {
                title => item.title,
                source => item.source,
            }
        })
        .collect();

    // A fresh environment per render sidesteps template lifetime issues
    let env = Environment::new();
    let rendered = env.render_str(ANALYSIS_TEMPLATE, context! {
        ticker => ticker,
        price => format!("{:.2}", indicators.last_price),
        sma_50 => format!("{:.2}", indicators.sma_50),
        sma_200 => format!("{:.2}", indicators.sma_200),
        rsi => format!("{:.2}", indicators.rsi_14),
        macd => format!("{:.4}", indicators.macd),
        macd_signal => format!("{:.4}", indicators.macd_signal),
        volatility => format!("{:.2}", indicators.volatility_pct),
        avg_volume => thousands(indicators.avg_volume),
        news => news_context,
    })?;
    Ok(rendered)
}

/// Render the "do we need news?" decision prompt
pub fn needs_news_prompt(indicators: &IndicatorSet) -> Result<String> {
    let env = Environment::new();
    let rendered = env.render_str(NEEDS_NEWS_TEMPLATE, context! {
        price => format!("{:.2}", indicators.last_price),
        sma_50 => format!("{:.2}", indicators.sma_50),
        sma_200 => format!("{:.2}", indicators.sma_200),
    })?;
    Ok(rendered)
}

/// Render the article summary prompt, truncating the content
pub fn summary_prompt(content: &str, max_chars: usize) -> Result<String> {
    let env = Environment::new();
    let rendered = env.render_str(SUMMARY_TEMPLATE, context! {
        content => truncate_chars(content, max_chars),
    })?;
    Ok(rendered)
}

/// Truncate to a character count, never splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Format a float with thousands separators and no decimals
fn thousands(value: f64) -> String {
    let whole = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_indicators() -> IndicatorSet {
        IndicatorSet {
            last_price: 187.456,
            sma_50: 180.0,
            sma_200: 170.5,
            rsi_14: 61.2345,
            macd: 1.23456,
            macd_signal: 0.98765,
            volatility_pct: 2.345,
            avg_volume: 1_234_567.0,
        }
    }

    #[test]
    fn test_analysis_prompt_embeds_metrics() {
        let prompt = analysis_prompt("NVDA", &sample_indicators(), &[]).unwrap();
        assert!(prompt.contains("Stock Analysis Report for NVDA"));
        assert!(prompt.contains("Current Price: $187.46"));
        assert!(prompt.contains("RSI (14): 61.23"));
        assert!(prompt.contains("MACD: 1.2346"));
        assert!(prompt.contains("Avg. Volume (50d): 1,234,567"));
        assert!(prompt.contains("Recommendation: [Your Verdict]"));
        assert!(!prompt.contains("Recent News"));
    }

    #[test]
    fn test_analysis_prompt_numbers_news() {
        let news = vec![
            NewsItem {
                title: "Earnings beat".to_string(),
                source: "reuters.com".to_string(),
                url: String::new(),
                published_date: None,
                content: String::new(),
                summary: None,
            },
            NewsItem {
                title: "Guidance raised".to_string(),
                source: "ft.com".to_string(),
                url: String::new(),
                published_date: None,
                content: String::new(),
                summary: None,
            },
        ];

        let prompt = analysis_prompt("NVDA", &sample_indicators(), &news).unwrap();
        assert!(prompt.contains("1. Earnings beat (reuters.com)"));
        assert!(prompt.contains("2. Guidance raised (ft.com)"));
    }

    #[test]
    fn test_needs_news_prompt() {
        let prompt = needs_news_prompt(&sample_indicators()).unwrap();
        assert!(prompt.contains("Current Price: $187.46"));
        assert!(prompt.contains("Answer ONLY \"Yes\" or \"No\""));
    }

    #[test]
    fn test_summary_prompt_truncates_on_char_boundary() {
        let content = "é".repeat(5000);
        let prompt = summary_prompt(&content, 3000).unwrap();
        assert!(prompt.matches('é').count() == 3000);
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-12_000.4), "-12,000");
    }
}
