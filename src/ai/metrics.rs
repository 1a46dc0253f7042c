//! Pipeline Metrics Collection
//!
//! Per-run aggregation of generation calls, tokens and latency, broken down
//! by pipeline stage. [`MeteredProvider`] wraps the run's provider so every
//! call is counted without the agents knowing about metrics.
//!
//! ## Usage
//!
//! ```ignore
//! let metrics = create_shared_metrics(run_id);
//! let provider = MeteredProvider::wrap(provider, metrics.clone());
//! metrics.start_stage("simulation");
//! // ... calls through `provider` ...
//! println!("{}", metrics.summary().display());
//! ```

use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::ai::provider::{LlmProvider, LlmResponse, SharedProvider};
use crate::types::Result;

// =============================================================================
// Metrics Collector
// =============================================================================

pub struct MetricsCollector {
    run_id: String,
    start_time: Instant,
    state: Mutex<MetricsState>,
}

#[derive(Default)]
struct MetricsState {
    current_stage: String,
    stages: Vec<StageMetrics>,
    failed_calls: u32,
}

/// Metrics for a single pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageMetrics {
    pub name: String,
    pub api_calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub latency_ms: u64,
}

/// Summary statistics for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub run_id: String,
    pub total_duration_ms: u64,
    pub api_calls: u32,
    pub failed_calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub avg_latency_ms: f64,
    pub stages: Vec<StageMetrics>,
}

impl MetricsCollector {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_time: Instant::now(),
            state: Mutex::new(MetricsState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MetricsState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Metrics state mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Attribute subsequent calls to `name`
    pub fn start_stage(&self, name: impl Into<String>) {
        self.state().current_stage = name.into();
    }

    /// Record metrics from a successful response
    pub fn record_response(&self, response: &LlmResponse) {
        let mut state = self.state();
        let stage_name = state.current_stage.clone();

        let stage = match state.stages.iter().position(|s| s.name == stage_name) {
            Some(idx) => &mut state.stages[idx],
            None => {
                state.stages.push(StageMetrics {
                    name: stage_name,
                    ..Default::default()
                });
                let last = state.stages.len() - 1;
                &mut state.stages[last]
            }
        };

        stage.api_calls += 1;
        stage.input_tokens += response.usage.input_tokens as u64;
        stage.output_tokens += response.usage.output_tokens as u64;
        stage.latency_ms += response.timing.total_ms;
    }

    pub fn record_failure(&self) {
        self.state().failed_calls += 1;
    }

    pub fn summary(&self) -> MetricsSummary {
        let state = self.state();

        let api_calls: u32 = state.stages.iter().map(|s| s.api_calls).sum();
        let input_tokens: u64 = state.stages.iter().map(|s| s.input_tokens).sum();
        let output_tokens: u64 = state.stages.iter().map(|s| s.output_tokens).sum();
        let total_latency: u64 = state.stages.iter().map(|s| s.latency_ms).sum();

        let avg_latency = if api_calls > 0 {
            total_latency as f64 / api_calls as f64
        } else {
            0.0
        };

        MetricsSummary {
            run_id: self.run_id.clone(),
            total_duration_ms: self.start_time.elapsed().as_millis() as u64,
            api_calls,
            failed_calls: state.failed_calls,
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            avg_latency_ms: avg_latency,
            stages: state.stages.clone(),
        }
    }
}

impl MetricsSummary {
    /// Format summary for display
    pub fn display(&self) -> String {
        let mut out = format!(
            "Run: {}\n\
             Duration: {:.1}s\n\
             API Calls: {} ({} failed)\n\
             Tokens: {} (input: {}, output: {})\n\
             Avg Latency: {:.0}ms",
            self.run_id,
            self.total_duration_ms as f64 / 1000.0,
            self.api_calls,
            self.failed_calls,
            self.total_tokens,
            self.input_tokens,
            self.output_tokens,
            self.avg_latency_ms,
        );
        for stage in &self.stages {
            out.push_str(&format!(
                "\n  {:<22} {:>3} calls {:>7} tokens",
                stage.name,
                stage.api_calls,
                stage.input_tokens + stage.output_tokens
            ));
        }
        out
    }

    pub fn calls_for(&self, stage: &str) -> u32 {
        self.stages
            .iter()
            .find(|s| s.name == stage)
            .map(|s| s.api_calls)
            .unwrap_or(0)
    }
}

/// Shared metrics collector for pipeline stages
pub type SharedMetrics = Arc<MetricsCollector>;

pub fn create_shared_metrics(run_id: impl Into<String>) -> SharedMetrics {
    Arc::new(MetricsCollector::new(run_id))
}

// =============================================================================
// Metered Provider
// =============================================================================

/// Provider decorator that records every call into a [`MetricsCollector`]
pub struct MeteredProvider {
    inner: SharedProvider,
    metrics: SharedMetrics,
}

impl MeteredProvider {
    pub fn wrap(inner: SharedProvider, metrics: SharedMetrics) -> SharedProvider {
        Arc::new(Self { inner, metrics })
    }
}

#[async_trait]
impl LlmProvider for MeteredProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        match self.inner.generate(prompt).await {
            Ok(response) => {
                self.metrics.record_response(&response);
                Ok(response)
            }
            Err(e) => {
                self.metrics.record_failure();
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn health_check(&self) -> Result<bool> {
        self.inner.health_check().await
    }
}

// =============================================================================
// Tests
// =============================================================================
