//! AI Integration Layer
//!
//! Generation-service providers, prompt templates and per-run metrics.

pub mod metrics;
pub mod prompt;
pub mod provider;

pub use metrics::{
    MeteredProvider, MetricsCollector, MetricsSummary, SharedMetrics, StageMetrics,
    create_shared_metrics,
};
pub use prompt::{PromptBindings, PromptTemplate};
pub use provider::{
    GeminiProvider, GenerationResult, LlmProvider, LlmResponse, OllamaProvider, OpenAiProvider,
    ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage, create_provider,
};
