//! Conversation Agents
//!
//! An agent is a role prompt bound to a provider. It keeps no conversation
//! state: the transcript and the current query arrive with every call, and
//! each call renders one prompt and issues exactly one generation request.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::analysis::PersonalityAnalysis;
use super::prompts;
use super::transcript::AgentRole;
use crate::ai::{PromptBindings, PromptTemplate, SharedProvider};
use crate::constants::simulation::SALES_SPEAKER_SUFFIX;
use crate::types::Result;

/// A meeting participant that answers a query given the transcript so far
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    async fn respond(&self, transcript: &str, query: &str) -> Result<String>;

    fn role(&self) -> AgentRole;

    /// Label written before this agent's turns in the transcript
    fn speaker(&self) -> &str;
}

/// Template-driven agent used for both meeting roles
pub struct RoleAgent {
    role: AgentRole,
    speaker: String,
    provider: SharedProvider,
    template: PromptTemplate,
    bindings: PromptBindings,
    analysis: Option<Arc<PersonalityAnalysis>>,
}

impl RoleAgent {
    pub fn new(
        role: AgentRole,
        speaker: impl Into<String>,
        provider: SharedProvider,
        template: PromptTemplate,
        bindings: PromptBindings,
    ) -> Self {
        Self {
            role,
            speaker: speaker.into(),
            provider,
            template,
            bindings,
            analysis: None,
        }
    }

    /// Inject a shared personality analysis as `{analysis}` on every call
    pub fn with_analysis(mut self, analysis: Arc<PersonalityAnalysis>) -> Self {
        self.analysis = Some(analysis);
        self
    }

    fn render(&self, transcript: &str, query: &str) -> Result<String> {
        let mut bindings = self.bindings.clone();
        if let Some(analysis) = &self.analysis {
            bindings.set("analysis", analysis.as_str());
        }
        bindings.set("transcript", transcript);
        bindings.set("query", query);
        self.template.render(&bindings)
    }
}

#[async_trait]
impl ConversationAgent for RoleAgent {
    async fn respond(&self, transcript: &str, query: &str) -> Result<String> {
        let prompt = self.render(transcript, query)?;
        debug!(
            "{} agent prompt: {} chars (transcript {} chars)",
            self.role,
            prompt.len(),
            transcript.len()
        );

        let response = self.provider.generate(&prompt).await?;
        Ok(response.text())
    }

    fn role(&self) -> AgentRole {
        self.role
    }

    fn speaker(&self) -> &str {
        &self.speaker
    }
}

/// Agent speaking as the modeled person, styled by their personality analysis
pub fn persona_agent(
    provider: SharedProvider,
    persona_name: &str,
    analysis: Arc<PersonalityAnalysis>,
    offering: &str,
) -> RoleAgent {
    let bindings = PromptBindings::new()
        .bind("person_name", persona_name)
        .bind("offering", offering);

    RoleAgent::new(
        AgentRole::Persona,
        persona_name,
        provider,
        prompts::persona_response(),
        bindings,
    )
    .with_analysis(analysis)
}

/// Agent representing the offering, leaning on the hybrid flexible-to-full-time narrative
pub fn sales_agent(provider: SharedProvider, offering: &str) -> RoleAgent {
    RoleAgent::new(
        AgentRole::Sales,
        sales_speaker(offering),
        provider,
        prompts::sales_response(),
        PromptBindings::new().bind("offering", offering),
    )
}

pub fn sales_speaker(offering: &str) -> String {
    format!("{} {}", offering, SALES_SPEAKER_SUFFIX)
}
