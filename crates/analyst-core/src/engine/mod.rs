//! Analysis orchestration
//!
//! [`MarketAnalyst`] wires the market data, news, and LLM layers into the
//! end-to-end pipeline and records a human-readable reasoning log.

mod analyst;
mod result;

pub use analyst::MarketAnalyst;
pub use result::{AnalysisResult, PriceTargets, Verdict};
