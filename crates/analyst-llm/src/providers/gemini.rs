//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait over the Gemini
//! `generateContent` REST endpoint.
//! See: https://ai.google.dev/api/generate-content

use crate::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, Result, Role, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default per-request timeout; override with [`GeminiProvider::with_timeout`]
const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// Google Gemini provider
///
/// Supports the Gemini model family, including:
/// - gemini-2.0-flash
/// - gemini-1.5-pro
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google AI Studio API key
    ///
    /// # Returns
    ///
    /// A new Gemini provider instance
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            api_base: GEMINI_API_BASE.to_string(),
        })
    }

    /// Create a provider from environment variable
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            crate::LLMError::ConfigurationError(
                "GEMINI_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    /// Override the API base URL (e.g., for a proxy)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the per-request timeout
    ///
    /// Rebuilds the HTTP client; the timeout covers the whole request
    /// including the streamed response body.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn build_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| Content {
                role: match m.role {
                    Role::Assistant => "model",
                    // Gemini has no system role in `contents`; system text
                    // travels in `systemInstruction` instead.
                    Role::User | Role::System => "user",
                },
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: request.system.as_ref().map(|s| SystemInstruction {
                parts: vec![Part { text: s.clone() }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                stop_sequences: request.stop_sequences.clone(),
            },
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API");

        let model = request.model.clone();
        let gemini_request = Self::build_request(&request);

        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        // Handle errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => crate::LLMError::AuthenticationFailed,
                429 => crate::LLMError::RateLimitExceeded(error_text),
                400 => crate::LLMError::InvalidRequest(error_text),
                404 => crate::LLMError::ModelNotFound(model),
                _ => crate::LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        // Parse response
        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            crate::LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        if let Some(feedback) = &gemini_response.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(crate::LLMError::ContentBlocked(reason.clone()));
            }
        }

        let candidate = gemini_response.candidates.into_iter().next().ok_or_else(|| {
            crate::LLMError::UnexpectedResponse("Response contained no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let finish_reason = candidate.finish_reason.as_deref().unwrap_or("STOP");
        debug!(
            "Received response - finish_reason: {}, candidate length: {}",
            finish_reason,
            text.len()
        );

        let usage = gemini_response.usage_metadata.unwrap_or_default();

        // Convert to our format
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: match finish_reason {
                "STOP" => StopReason::EndTurn,
                "MAX_TOKENS" => StopReason::MaxTokens,
                "SAFETY" => StopReason::Safety,
                _ => {
                    debug!("Unknown finish reason: {}", finish_reason);
                    StopReason::Other
                }
            },
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// Gemini-specific request/response types
// These match the generateContent wire format exactly

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string());
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().name(), "gemini");
    }

    #[tokio::test]
    async fn test_with_timeout_is_enforced() {
        // Unroutable address (RFC 5737 TEST-NET); the request must be cut
        // off by the configured timeout rather than hang
        let provider = GeminiProvider::new("test-key".to_string())
            .unwrap()
            .with_timeout(std::time::Duration::from_millis(50))
            .unwrap()
            .with_api_base("http://192.0.2.1/v1beta");

        let request = CompletionRequest::builder("gemini-2.0-flash")
            .add_message(Message::user("ping"))
            .build();

        let started = std::time::Instant::now();
        let result = provider.complete(request).await;

        assert!(result.is_err());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_without_key() {
        // This will fail if GEMINI_API_KEY is not set
        // SAFETY: This is a test that modifies env vars, which is safe in single-threaded test context
        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
        }
        let result = GeminiProvider::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_request_maps_roles_and_config() {
        let request = CompletionRequest::builder("gemini-2.0-flash")
            .add_message(Message::user("What is the outlook?"))
            .add_message(Message::assistant("Bullish."))
            .system("You are a market analyst")
            .max_tokens(1000)
            .temperature(0.3)
            .build();

        let wire = GeminiProvider::build_request(&request);
        assert_eq!(wire.contents.len(), 2);
        assert_eq!(wire.contents[0].role, "user");
        assert_eq!(wire.contents[1].role, "model");
        assert!(wire.system_instruction.is_some());
        assert_eq!(wire.generation_config.max_output_tokens, 1000);
        assert_eq!(wire.generation_config.temperature, Some(0.3));

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("market analyst"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Recommendation: Hold"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7, "totalTokenCount": 49}
        }"#;

        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(
            candidate.content.as_ref().unwrap().parts[0].text,
            "Recommendation: Hold"
        );
        assert_eq!(parsed.usage_metadata.unwrap().prompt_token_count, 42);
    }

    #[test]
    fn test_parse_blocked_response() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.candidates.is_empty());
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
