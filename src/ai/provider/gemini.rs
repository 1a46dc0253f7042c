//! Google Gemini Provider
//!
//! LLM provider using the Generative Language API (`generateContent`).
//! Authenticates with an API key from config, `GOOGLE_API_KEY` or
//! `GEMINI_API_KEY`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{
    GenerationResult, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, status_error, transport_error,
};
use crate::constants::llm;
use crate::types::{Result, SimError};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Gemini provider with secure API key handling
pub struct GeminiProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| API_KEY_VARS.iter().find_map(|var| std::env::var(var).ok()))
            .ok_or_else(|| {
                SimError::Config(
                    "Gemini API key not found. Set GOOGLE_API_KEY env var or provide llm.api_key in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .unwrap_or_else(|| llm::DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SimError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Text of the first candidate, or the whole body when there is none.
fn interpret_response(raw: Value) -> (GenerationResult, TokenUsage, Option<String>) {
    let parsed: Option<GenerateContentResponse> = serde_json::from_value(raw.clone()).ok();

    let Some(parsed) = parsed else {
        return (GenerationResult::Opaque(raw), TokenUsage::default(), None);
    };

    let usage = parsed
        .usage_metadata
        .as_ref()
        .map(|u| {
            TokenUsage::new(
                u.prompt_token_count.unwrap_or(0),
                u.candidates_token_count.unwrap_or(0),
            )
        })
        .unwrap_or_default();

    let candidate = parsed.candidates.first();
    let finish_reason = candidate.and_then(|c| c.finish_reason.clone());

    let texts: Vec<&str> = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        (GenerationResult::Opaque(raw), usage, finish_reason)
    } else {
        (GenerationResult::Text(texts.concat()), usage, finish_reason)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        info!(
            "Generating with Gemini (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt);

        debug!(prompt_chars = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, "gemini"))?;

        if !response.status().is_success() {
            return Err(status_error(response, "gemini").await);
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| transport_error(e, "gemini"))?;

        let elapsed = start_time.elapsed();
        let (content, usage, finish_reason) = interpret_response(raw);

        if !content.is_text() {
            warn!(
                finish_reason = finish_reason.as_deref().unwrap_or("none"),
                "Gemini response carried no text parts"
            );
        }

        Ok(LlmResponse::with_metrics(
            content,
            usage,
            ResponseTiming::from_duration(elapsed),
            ResponseMetadata {
                model: self.model.clone(),
                provider: "gemini".to_string(),
                finish_reason,
            },
        ))
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models/{}", self.api_base, self.model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Gemini API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gemini API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gemini API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(ProviderConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .expect("Failed to create provider")
    }

    #[test]
    fn test_defaults() {
        let provider = provider();
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, "gemini-2.0-flash");
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(!format!("{:?}", provider).contains("test-key"));
    }

    #[test]
    fn test_request_shape() {
        let request = provider().build_request("Say hello");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["generationConfig"]["maxOutputTokens"].is_number());
    }

    #[test]
    fn test_interpret_text_response() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello, "}, {"text": "I'm Ada."}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        });

        let (content, usage, finish) = interpret_response(raw);
        assert_eq!(content, GenerationResult::Text("Hello, I'm Ada.".to_string()));
        assert_eq!(usage, TokenUsage::new(12, 5));
        assert_eq!(finish.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_interpret_blocked_response_is_opaque() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});

        let (content, usage, _) = interpret_response(raw.clone());
        assert_eq!(content, GenerationResult::Opaque(raw));
        assert_eq!(usage.total(), 0);
    }

    #[test]
    fn test_interpret_candidate_without_content() {
        let raw = json!({"candidates": [{"finishReason": "SAFETY"}]});

        let (content, _, finish) = interpret_response(raw.clone());
        assert_eq!(content.extract_text(), raw.to_string());
        assert_eq!(finish.as_deref(), Some("SAFETY"));
    }
}
