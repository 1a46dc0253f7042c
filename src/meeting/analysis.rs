//! Personality and Post-Conversation Analysis
//!
//! One-shot transformations around the simulated meeting:
//!
//! - [`PersonalityAnalyzer`] builds the profile the persona agent speaks from
//! - [`PostConversationAnalyzer`] turns the finished transcript into a refined
//!   analysis, a tailored pitch and a cold email, strictly in that order

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::prompts;
use crate::ai::{PromptBindings, SharedProvider};
use crate::types::Result;

/// Personality profile text, produced once per persona and then read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalityAnalysis(String);

impl PersonalityAnalysis {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonalityAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Personality Analyzer
// =============================================================================

pub struct PersonalityAnalyzer {
    provider: SharedProvider,
}

impl PersonalityAnalyzer {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Blank names or contexts are passed through as given.
    pub async fn analyze(&self, person_name: &str, context: &str) -> Result<PersonalityAnalysis> {
        info!("Analyzing personality for '{}'", person_name);

        let prompt = prompts::personality_analysis().render(
            &PromptBindings::new()
                .bind("person_name", person_name)
                .bind("context", context),
        )?;

        let response = self.provider.generate(&prompt).await?;
        let analysis = PersonalityAnalysis::new(response.text());
        debug!("Personality analysis: {} chars", analysis.as_str().len());
        Ok(analysis)
    }
}

// =============================================================================
// Post-Conversation Analyzer
// =============================================================================

/// Outputs of the post-conversation chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchArtifacts {
    pub refined_analysis: String,
    pub final_pitch: String,
    pub cold_email: String,
}

pub struct PostConversationAnalyzer {
    provider: SharedProvider,
    offering: String,
}

impl PostConversationAnalyzer {
    pub fn new(provider: SharedProvider, offering: impl Into<String>) -> Self {
        Self {
            provider,
            offering: offering.into(),
        }
    }

    pub async fn refined_analysis(&self, persona_name: &str, transcript: &str) -> Result<String> {
        let prompt = prompts::refined_analysis().render(
            &PromptBindings::new()
                .bind("person_name", persona_name)
                .bind("offering", self.offering.as_str())
                .bind("transcript", transcript),
        )?;
        Ok(self.provider.generate(&prompt).await?.text())
    }

    pub async fn tailored_pitch(&self, refined_analysis: &str, transcript: &str) -> Result<String> {
        let prompt = prompts::tailored_pitch().render(
            &PromptBindings::new()
                .bind("refined_analysis", refined_analysis)
                .bind("transcript", transcript)
                .bind("offering", self.offering.as_str()),
        )?;
        Ok(self.provider.generate(&prompt).await?.text())
    }

    /// Written as cold outreach; the prompt forbids mentioning the meeting.
    pub async fn cold_email(
        &self,
        final_pitch: &str,
        refined_analysis: &str,
        personality: &PersonalityAnalysis,
    ) -> Result<String> {
        let prompt = prompts::cold_email().render(
            &PromptBindings::new()
                .bind("personality_analysis", personality.as_str())
                .bind("refined_analysis", refined_analysis)
                .bind("final_pitch", final_pitch)
                .bind("offering", self.offering.as_str()),
        )?;
        Ok(self.provider.generate(&prompt).await?.text())
    }

    /// Refined analysis, then pitch, then email. The first failure stops the
    /// chain and nothing computed so far is returned.
    pub async fn run_chain(
        &self,
        persona_name: &str,
        transcript: &str,
        personality: &PersonalityAnalysis,
    ) -> Result<PitchArtifacts> {
        info!("Running post-conversation analysis for '{}'", persona_name);

        let refined_analysis = self.refined_analysis(persona_name, transcript).await?;
        let final_pitch = self.tailored_pitch(&refined_analysis, transcript).await?;
        let cold_email = self
            .cold_email(&final_pitch, &refined_analysis, personality)
            .await?;

        Ok(PitchArtifacts {
            refined_analysis,
            final_pitch,
            cold_email,
        })
    }
}
