//! Command-line stock analysis assistant

mod render;

use analyst_core::{AnalystConfig, MarketAnalyst, TavilyClient, YahooFinanceClient};
use analyst_llm::providers::GeminiProvider;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "LLM-assisted Buy/Hold/Sell analysis for a stock ticker", long_about = None)]
struct Args {
    /// Ticker symbol to analyze (e.g. AAPL)
    ticker: String,

    /// Print the full result as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Override the LLM model identifier
    #[arg(long)]
    model: Option<String>,
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let ticker = args.ticker.to_uppercase();

    let mut builder = AnalystConfig::builder().with_env_api_keys();
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build()?;

    let tavily = TavilyClient::from_config(&config)
        .context("news requires the TAVILY_API_KEY environment variable")?;
    let gemini = GeminiProvider::from_env()
        .context("narrative generation requires the GEMINI_API_KEY environment variable")?
        .with_timeout(config.request_timeout)?;

    let analyst = MarketAnalyst::new(
        Arc::new(YahooFinanceClient::new()),
        Arc::new(tavily),
        Arc::new(gemini),
        config,
    );

    info!(%ticker, "starting analysis");
    let result = analyst.analyze(&ticker).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::render_result(&result));
    }

    Ok(())
}
