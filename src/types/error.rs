//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! Generation-service failures are tagged with an [`ErrorCategory`] so the
//! presentation layer can tell an expired key from an exhausted quota. The
//! category is informational only: nothing in the pipeline retries or falls
//! back, every service failure aborts the run in progress.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Classification of generation-service failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Prompt too large for the model context
    TokenLimit,
    /// Missing, invalid or unauthorized API key
    Auth,
    /// Connectivity issues (DNS, refused, timed out)
    Network,
    /// Model or endpoint not available
    Unavailable,
    /// Request rejected as malformed
    BadRequest,
    /// Response body could not be decoded
    ParseError,
    /// Server-side failure
    Transient,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Generation-service error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Add provider context to existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota")
            || lower.contains("resource_exhausted")
        {
            return LlmError::with_provider(ErrorCategory::RateLimit, message, provider);
        }

        if lower.contains("token")
            && (lower.contains("limit") || lower.contains("exceed") || lower.contains("maximum"))
            || lower.contains("context length")
            || lower.contains("too large")
        {
            return LlmError::with_provider(ErrorCategory::TokenLimit, message, provider);
        }

        if lower.contains("auth")
            || lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("permission denied")
        {
            return LlmError::with_provider(ErrorCategory::Auth, message, provider);
        }

        if lower.contains("network")
            || lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("unreachable")
        {
            return LlmError::with_provider(ErrorCategory::Network, message, provider);
        }

        if lower.contains("503")
            || lower.contains("502")
            || lower.contains("service unavailable")
            || lower.contains("not found")
        {
            return LlmError::with_provider(ErrorCategory::Unavailable, message, provider);
        }

        if lower.contains("400") || lower.contains("bad request") || lower.contains("malformed") {
            return LlmError::with_provider(ErrorCategory::BadRequest, message, provider);
        }

        if lower.contains("parse") || lower.contains("json") || lower.contains("decode") {
            return LlmError::with_provider(ErrorCategory::ParseError, message, provider);
        }

        if lower.contains("500") || lower.contains("internal") || lower.contains("overloaded") {
            return LlmError::with_provider(ErrorCategory::Transient, message, provider);
        }

        LlmError::with_provider(ErrorCategory::Unknown, message, provider)
    }

    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        match status {
            429 => LlmError::with_provider(ErrorCategory::RateLimit, message, provider),
            401 | 403 => LlmError::with_provider(ErrorCategory::Auth, message, provider),
            400 => LlmError::with_provider(ErrorCategory::BadRequest, message, provider),
            404 => LlmError::with_provider(ErrorCategory::Unavailable, message, provider),
            500 | 502 | 503 | 504 => {
                LlmError::with_provider(ErrorCategory::Transient, message, provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SimError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    // -------------------------------------------------------------------------
    // Generation Service Errors
    // -------------------------------------------------------------------------
    /// Structured generation-service error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Local failure while preparing a request (client construction etc.)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Template '{template}' is missing a value for '{{{key}}}'")]
    Template { template: String, key: String },

    #[error("Pipeline failed at {stage}: {source}")]
    Pipeline {
        stage: &'static str,
        #[source]
        source: Box<SimError>,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<LlmError> for SimError {
    fn from(err: LlmError) -> Self {
        SimError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Wrap an error with the pipeline stage it aborted
    pub fn at_stage(stage: &'static str, source: SimError) -> Self {
        Self::Pipeline {
            stage,
            source: Box::new(source),
        }
    }

    /// Create a categorized LLM error
    pub fn llm_with_category(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Llm(LlmError::new(category, message))
    }

    /// Category of the underlying generation-service failure, if any
    pub fn llm_category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Llm(e) => Some(e.category),
            Self::Pipeline { source, .. } => source.llm_category(),
            _ => None,
        }
    }
}

/// Attach the failing pipeline stage to an error
pub trait StageExt<T> {
    fn at_stage(self, stage: &'static str) -> Result<T>;
}

impl<T> StageExt<T> for Result<T> {
    fn at_stage(self, stage: &'static str) -> Result<T> {
        self.map_err(|e| SimError::at_stage(stage, e))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::TokenLimit.to_string(), "TOKEN_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = ErrorClassifier::classify("Quota exceeded for model", "gemini");
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert_eq!(err.provider.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify("Invalid API key provided", "openai");
        assert_eq!(err.category, ErrorCategory::Auth);
    }

    #[test]
    fn test_classify_network() {
        let err = ErrorClassifier::classify("Connection timed out after 30s", "ollama");
        assert_eq!(err.category, ErrorCategory::Network);
    }

    #[test]
    fn test_classify_unknown() {
        let err = ErrorClassifier::classify("Something weird happened", "test");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited", "test");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "test");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = ErrorClassifier::classify_http_status(500, "Server error", "test");
        assert_eq!(server_error.category, ErrorCategory::Transient);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_template_error_display() {
        let err = SimError::Template {
            template: "persona".to_string(),
            key: "transcript".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Template 'persona' is missing a value for '{transcript}'"
        );
    }

    #[test]
    fn test_stage_keeps_category() {
        let inner = SimError::llm_with_category(ErrorCategory::Auth, "bad key");
        let result: Result<()> = Err(inner);
        let err = result.at_stage("sales objection").unwrap_err();

        assert!(err.to_string().starts_with("Pipeline failed at sales objection"));
        assert_eq!(err.llm_category(), Some(ErrorCategory::Auth));
    }
}
