//! Scripted provider for unit tests.
//!
//! Answers each prompt with the first rule whose needle the prompt contains,
//! falling back to a numbered default reply. Every prompt is recorded.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::{GenerationResult, LlmProvider, LlmResponse, TokenUsage};
use crate::types::{ErrorCategory, LlmError, Result};

#[derive(Clone)]
enum Reply {
    Text(String),
    Opaque(Value),
    Fail(String),
}

#[derive(Default)]
pub(crate) struct ScriptedProvider {
    rules: Vec<(String, Reply)>,
    prompts: Mutex<Vec<String>>,
    unhealthy: bool,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` to prompts containing `needle`
    pub(crate) fn on(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    /// Reply with a non-text result to prompts containing `needle`
    pub(crate) fn on_opaque(mut self, needle: &str, value: Value) -> Self {
        self.rules.push((needle.to_string(), Reply::Opaque(value)));
        self
    }

    /// Report a failed health check
    pub(crate) fn unhealthy(mut self) -> Self {
        self.unhealthy = true;
        self
    }

    /// Fail prompts containing `needle`
    pub(crate) fn fail_on(mut self, needle: &str, message: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Fail(message.to_string())));
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Text(format!("reply {}", call)));

        let content = match reply {
            Reply::Text(text) => GenerationResult::Text(text),
            Reply::Opaque(value) => GenerationResult::Opaque(value),
            Reply::Fail(message) => {
                return Err(LlmError::with_provider(
                    ErrorCategory::Transient,
                    message,
                    "scripted",
                )
                .into());
            }
        };

        let mut response = LlmResponse::content_only(content);
        response.usage = TokenUsage::new(10, 5);
        Ok(response)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.unhealthy)
    }
}
