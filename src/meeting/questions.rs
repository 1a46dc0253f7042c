//! Dynamic Persona Questions
//!
//! Asks the model for follow-up questions the persona might raise and splits
//! the free-form answer into lines. The requested count is only a hint to the
//! model: fewer, more, or zero lines are all valid results, and bounding how
//! many get used is the caller's job. A non-text response yields no questions.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::prompts;
use crate::ai::{GenerationResult, PromptBindings, SharedProvider};
use crate::constants::questions::{MAX_REQUESTED, MIN_REQUESTED};
use crate::types::Result;

/// Produces the persona's dynamic questions for the current transcript
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, persona_name: &str, transcript: &str) -> Result<Vec<String>>;
}

/// Split raw model output into trimmed, non-empty lines in original order.
///
/// No deduplication and no count enforcement.
pub fn parse_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct DynamicQuestionGenerator {
    provider: SharedProvider,
    offering: String,
}

impl DynamicQuestionGenerator {
    pub fn new(provider: SharedProvider, offering: impl Into<String>) -> Self {
        Self {
            provider,
            offering: offering.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for DynamicQuestionGenerator {
    async fn generate(&self, persona_name: &str, transcript: &str) -> Result<Vec<String>> {
        let prompt = prompts::dynamic_questions().render(
            &PromptBindings::new()
                .bind("person_name", persona_name)
                .bind("transcript", transcript)
                .bind("min_questions", MIN_REQUESTED.to_string())
                .bind("max_questions", MAX_REQUESTED.to_string())
                .bind("offering", self.offering.as_str()),
        )?;

        let response = self.provider.generate(&prompt).await?;
        let questions = match &response.content {
            GenerationResult::Text(raw) => parse_questions(raw),
            GenerationResult::Opaque(value) => {
                warn!("Question request returned no text, skipping dynamic rounds: {}", value);
                return Ok(Vec::new());
            }
        };

        if questions.is_empty() {
            warn!("Question generator returned no usable lines for '{}'", persona_name);
        } else {
            debug!("Generated {} dynamic questions", questions.len());
        }
        Ok(questions)
    }
}
