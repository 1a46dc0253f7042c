//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait: one rendered prompt in, one response out.
//! Providers are single-shot; nothing here retries, batches or streams.
//!
//! Responses are capability-typed. A provider that found text returns
//! [`GenerationResult::Text`]; anything else (a safety block, an empty
//! candidate list) is kept verbatim as [`GenerationResult::Opaque`] and
//! coerced to a string only when a caller asks for text.

mod gemini;
mod ollama;
mod openai;
#[cfg(test)]
pub(crate) mod scripted;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::constants::{llm, network};
use crate::types::{Result, SimError};

// =============================================================================
// Generation Result
// =============================================================================

/// What a generation call produced
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    /// The service returned text
    Text(String),
    /// The service returned something without extractable text
    Opaque(Value),
}

impl GenerationResult {
    /// Plain text of the result.
    ///
    /// `Text(x)` yields exactly `x`. `Opaque(v)` yields the compact JSON
    /// rendering of `v`, which is deterministic for a given value.
    pub fn extract_text(&self) -> String {
        match self {
            GenerationResult::Text(text) => text.clone(),
            GenerationResult::Opaque(value) => value.to_string(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, GenerationResult::Text(_))
    }
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including content, usage metrics and timing
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: GenerationResult,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: GenerationResult) -> Self {
        Self {
            content,
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn with_metrics(
        content: GenerationResult,
        usage: TokenUsage,
        timing: ResponseTiming,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            content,
            usage,
            timing,
            metadata,
        }
    }

    /// Shorthand for `self.content.extract_text()`
    pub fn text(&self) -> String {
        self.content.extract_text()
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Wall clock time in milliseconds
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
    /// Provider-reported reason generation stopped, if any
    pub finish_reason: Option<String>,
}

/// Shared LLM provider handle, one per pipeline run.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// API keys are never serialized and are redacted in debug output.
/// Each provider converts the key to SecretString internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "gemini", "openai", "ollama"
    pub provider: String,
    /// Model name (provider-specific); `None` selects the provider default
    pub model: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    pub max_tokens: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: llm::DEFAULT_PROVIDER.to_string(),
            model: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: llm::DEFAULT_TEMPERATURE,
            api_key: None,
            api_base: None,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// A text generation service
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Issue exactly one generation request for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.clone())?)),
        _ => Err(SimError::Config(format!(
            "Unknown provider: {}. Supported: gemini, openai, ollama",
            config.provider
        ))),
    }
}

/// Map a reqwest transport failure onto a categorized error
pub(crate) fn transport_error(err: reqwest::Error, provider: &str) -> SimError {
    let category = if err.is_timeout() || err.is_connect() {
        ErrorCategory::Network
    } else if err.is_decode() {
        ErrorCategory::ParseError
    } else {
        return ErrorClassifier::classify(&err.to_string(), provider).into();
    };
    LlmError::with_provider(category, format!("{} request failed: {}", provider, err), provider)
        .into()
}

/// Map a non-success HTTP response onto a categorized error
pub(crate) async fn status_error(response: reqwest::Response, provider: &str) -> SimError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ErrorClassifier::classify_http_status(
        status.as_u16(),
        &format!("{} API error ({}): {}", provider, status, body),
        provider,
    )
    .into()
}
