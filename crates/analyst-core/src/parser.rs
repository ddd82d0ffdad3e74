//! Heuristic parser for model-generated analysis narratives
//!
//! The narrative prompt asks for a strict Recommendation/Reasons/Targets
//! layout, but models drift. The parser scans line by line, matches
//! section markers case-insensitively, and always produces a verdict:
//! a malformed narrative parses to "Hold" with no reasons or targets.

use crate::engine::{PriceTargets, Verdict};

const MAX_KEY_POINTS: usize = 3;
const DEFAULT_RECOMMENDATION: &str = "Hold";

/// Parse a narrative into a structured verdict. Never fails.
pub fn parse_analysis(text: &str) -> Verdict {
    Verdict {
        recommendation: extract_recommendation(text),
        key_points: extract_key_points(text),
        targets: extract_price_targets(text),
        raw: text.to_string(),
    }
}

/// First line containing "recommendation:", text after the last colon
fn extract_recommendation(text: &str) -> String {
    for line in text.lines() {
        if line.to_lowercase().contains("recommendation:") {
            if let Some((_, value)) = line.rsplit_once(':') {
                return value.trim().to_string();
            }
        }
    }
    DEFAULT_RECOMMENDATION.to_string()
}

/// Bullet lines after a "reasons:" marker, up to three
fn extract_key_points(text: &str) -> Vec<String> {
    let mut points = Vec::new();
    let mut in_reasons = false;
    for line in text.lines() {
        if line.to_lowercase().contains("reasons:") {
            in_reasons = true;
            continue;
        }
        let trimmed = line.trim();
        if in_reasons {
            if let Some(point) = trimmed.strip_prefix('-') {
                points.push(point.trim().to_string());
            }
        }
        if points.len() >= MAX_KEY_POINTS {
            break;
        }
    }
    points
}

/// Lines tagged conservative/aggressive, value after the last dollar sign
fn extract_price_targets(text: &str) -> PriceTargets {
    let mut targets = PriceTargets::default();
    for line in text.lines() {
        let lower = line.to_lowercase();
        if lower.contains("conservative:") {
            targets.conservative = dollar_value(line);
        } else if lower.contains("aggressive:") {
            targets.aggressive = dollar_value(line);
        }
    }
    targets
}

fn dollar_value(line: &str) -> Option<String> {
    line.rsplit_once('$')
        .map(|(_, value)| value.trim().to_string())
}
