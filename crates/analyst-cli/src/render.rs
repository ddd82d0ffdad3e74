//! Plain-text rendering of analysis results

use analyst_core::{AnalysisResult, NewsItem, Verdict};

/// Render the full analysis as terminal-friendly text
pub fn render_result(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("=== {} Analysis ===\n\n", result.ticker));

    let indicators = &result.indicators;
    output.push_str(&format!("Price:        ${:.2}\n", result.price));
    output.push_str(&format!(
        "SMA 50:       ${:.2} ({})\n",
        indicators.sma_50,
        trend_label(result.price, indicators.sma_50)
    ));
    output.push_str(&format!(
        "SMA 200:      ${:.2} ({})\n",
        indicators.sma_200,
        trend_label(result.price, indicators.sma_200)
    ));
    output.push_str(&format!("RSI (14):     {:.2}\n", indicators.rsi_14));
    output.push_str(&format!(
        "MACD:         {:.4} (signal {:.4})\n",
        indicators.macd, indicators.macd_signal
    ));
    output.push_str(&format!(
        "Volatility:   {:.2}%\n",
        indicators.volatility_pct
    ));
    output.push_str(&format!("Avg Volume:   {:.0}\n", indicators.avg_volume));

    render_news(&mut output, &result.news, result.news_error.as_deref());

    match (&result.verdict, &result.analysis_error) {
        (Some(verdict), _) => render_verdict(&mut output, verdict),
        (None, Some(error)) => {
            output.push_str(&format!("\nAnalysis unavailable: {error}\n"));
        }
        (None, None) => output.push_str("\nAnalysis unavailable\n"),
    }

    output.push_str("\nReasoning:\n");
    for step in &result.reasoning {
        output.push_str(&format!("  {step}\n"));
    }

    output
}

fn trend_label(price: f64, sma: f64) -> &'static str {
    if price >= sma { "above" } else { "below" }
}

fn render_news(output: &mut String, news: &[NewsItem], news_error: Option<&str>) {
    if let Some(error) = news_error {
        output.push_str(&format!("\nNews unavailable: {error}\n"));
        return;
    }
    if news.is_empty() {
        return;
    }

    output.push_str("\nRecent News:\n");
    for (index, item) in news.iter().enumerate() {
        output.push_str(&format!("{}. {} ({})\n", index + 1, item.title, item.source));
        if let Some(summary) = &item.summary {
            for line in summary.lines() {
                output.push_str(&format!("   {line}\n"));
            }
        }
    }
}

fn render_verdict(output: &mut String, verdict: &Verdict) {
    output.push_str(&format!("\nRecommendation: {}\n", verdict.recommendation));

    if !verdict.key_points.is_empty() {
        output.push_str("Key Reasons:\n");
        for point in &verdict.key_points {
            output.push_str(&format!("  - {point}\n"));
        }
    }

    if let Some(conservative) = &verdict.targets.conservative {
        output.push_str(&format!("Conservative Target: ${conservative}\n"));
    }
    if let Some(aggressive) = &verdict.targets.aggressive {
        output.push_str(&format!("Aggressive Target:   ${aggressive}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::{IndicatorSet, PriceTargets};
    use chrono::Utc;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            ticker: "AAPL".to_string(),
            price: 210.5,
            indicators: IndicatorSet {
                last_price: 210.5,
                sma_50: 200.0,
                sma_200: 190.0,
                rsi_14: 58.3,
                macd: 2.1234,
                macd_signal: 1.8765,
                volatility_pct: 1.75,
                avg_volume: 60_000_000.0,
            },
            news: vec![NewsItem {
                title: "Record services revenue".to_string(),
                source: "reuters.com".to_string(),
                url: "https://reuters.com/a".to_string(),
                published_date: None,
                content: String::new(),
                summary: Some("- Services grew 12%".to_string()),
            }],
            news_error: None,
            verdict: Some(Verdict {
                recommendation: "Buy".to_string(),
                key_points: vec!["Uptrend intact".to_string()],
                targets: PriceTargets {
                    conservative: Some("220".to_string()),
                    aggressive: Some("250".to_string()),
                },
                raw: String::new(),
            }),
            analysis_error: None,
            price_history: vec![205.0, 208.0, 210.5],
            sma_50_history: vec![None, None, Some(200.0)],
            sma_200_history: vec![None, None, None],
            reasoning: vec!["Step 1: Fetching 1y history for AAPL".to_string()],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_full_result() {
        let text = render_result(&sample_result());
        assert!(text.contains("=== AAPL Analysis ==="));
        assert!(text.contains("Price:        $210.50"));
        assert!(text.contains("SMA 50:       $200.00 (above)"));
        assert!(text.contains("1. Record services revenue (reuters.com)"));
        assert!(text.contains("   - Services grew 12%"));
        assert!(text.contains("Recommendation: Buy"));
        assert!(text.contains("Conservative Target: $220"));
        assert!(text.contains("Step 1: Fetching 1y history for AAPL"));
    }

    #[test]
    fn test_render_degraded_result() {
        let mut result = sample_result();
        result.news = Vec::new();
        result.news_error = Some("rate limited".to_string());
        result.verdict = None;
        result.analysis_error = Some("generation blocked".to_string());

        let text = render_result(&result);
        assert!(text.contains("News unavailable: rate limited"));
        assert!(text.contains("Analysis unavailable: generation blocked"));
        assert!(!text.contains("Recommendation:"));
    }
}
