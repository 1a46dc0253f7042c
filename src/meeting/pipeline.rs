//! Meeting Pipeline
//!
//! End-to-end run for one persona:
//!
//! 1. Personality analysis
//! 2. Simulated meeting (persona and sales agents, dynamic questions)
//! 3. Refined analysis → tailored pitch → cold email
//! 4. Conversation review
//! 5. Record appended to the store
//!
//! Every step is sequential and any generation failure aborts the run before
//! step 5, so a store never holds a partial record.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::agents::{persona_agent, sales_agent};
use super::analysis::{PersonalityAnalyzer, PostConversationAnalyzer};
use super::questions::DynamicQuestionGenerator;
use super::record::{ConversationRecord, RecordStore};
use super::review::ReviewAgent;
use super::simulator::{ConversationSimulator, SimulationSettings};
use crate::ai::{MeteredProvider, MetricsSummary, SharedProvider, create_shared_metrics};
use crate::config::Config;
use crate::constants::simulation::{DEFAULT_MAX_ROUNDS, DEFAULT_OFFERING};
use crate::types::{Result, StageExt};

pub const STAGE_PERSONALITY: &str = "personality_analysis";
pub const STAGE_SIMULATION: &str = "simulation";
pub const STAGE_POST_ANALYSIS: &str = "post_analysis";
pub const STAGE_REVIEW: &str = "review";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_rounds: usize,
    pub offering: String,
    /// Default review focus when the request carries none
    pub review_focus: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            offering: DEFAULT_OFFERING.to_string(),
            review_focus: None,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_rounds: config.simulation.max_rounds,
            offering: config.simulation.offering.clone(),
            review_focus: config.review.focus.clone(),
        }
    }
}

/// Input for one pipeline run. Blank values are passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct SimulationRequest {
    pub persona_name: String,
    pub context: String,
    pub review_focus: Option<String>,
}

impl SimulationRequest {
    pub fn new(persona_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            persona_name: persona_name.into(),
            context: context.into(),
            review_focus: None,
        }
    }

    pub fn with_focus(mut self, focus: Option<String>) -> Self {
        self.review_focus = focus;
        self
    }
}

/// Every artifact of a completed run, in presentation order
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub record_id: Uuid,
    pub persona_name: String,
    pub personality_analysis: String,
    pub transcript: String,
    pub review: String,
    pub refined_analysis: String,
    pub final_pitch: String,
    pub cold_email: String,
    pub questions: Vec<String>,
    pub rounds: usize,
    pub metrics: MetricsSummary,
}

pub struct MeetingPipeline {
    provider: SharedProvider,
    settings: PipelineSettings,
}

impl MeetingPipeline {
    pub fn new(provider: SharedProvider, settings: PipelineSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn run(
        &self,
        request: &SimulationRequest,
        store: &mut dyn RecordStore,
    ) -> Result<PipelineOutput> {
        let run_id = Uuid::new_v4();
        let metrics = create_shared_metrics(run_id.to_string());
        let provider = MeteredProvider::wrap(self.provider.clone(), metrics.clone());
        let name = request.persona_name.as_str();
        let offering = self.settings.offering.as_str();

        info!(
            "Starting pipeline run {} for '{}' ({} via {})",
            run_id,
            name,
            provider.model(),
            provider.name()
        );

        metrics.start_stage(STAGE_PERSONALITY);
        let analysis = PersonalityAnalyzer::new(provider.clone())
            .analyze(name, &request.context)
            .await
            .at_stage(STAGE_PERSONALITY)?;
        let analysis = Arc::new(analysis);

        metrics.start_stage(STAGE_SIMULATION);
        let persona = persona_agent(provider.clone(), name, analysis.clone(), offering);
        let sales = sales_agent(provider.clone(), offering);
        let questions = DynamicQuestionGenerator::new(provider.clone(), offering);
        let simulator = ConversationSimulator::new(SimulationSettings {
            max_rounds: self.settings.max_rounds,
            persona_name: name.to_string(),
            offering: offering.to_string(),
        });
        let outcome = simulator
            .run(&persona, &sales, &questions)
            .await
            .at_stage(STAGE_SIMULATION)?;
        let rounds = outcome.rounds;
        let generated_questions = outcome.questions;
        let transcript = outcome.transcript.into_string();

        metrics.start_stage(STAGE_POST_ANALYSIS);
        let artifacts = PostConversationAnalyzer::new(provider.clone(), offering)
            .run_chain(name, &transcript, &analysis)
            .await
            .at_stage(STAGE_POST_ANALYSIS)?;

        metrics.start_stage(STAGE_REVIEW);
        let focus = request
            .review_focus
            .as_deref()
            .or(self.settings.review_focus.as_deref());
        let review = ReviewAgent::new(provider)
            .review(&transcript, focus)
            .await
            .at_stage(STAGE_REVIEW)?;

        let record = ConversationRecord {
            id: run_id,
            created_at: Utc::now(),
            persona_name: name.to_string(),
            transcript: transcript.clone(),
            review: review.clone(),
            personality_analysis: analysis.as_str().to_string(),
            final_pitch: artifacts.final_pitch.clone(),
            cold_email: artifacts.cold_email.clone(),
        };
        store.append(record);

        let summary = metrics.summary();
        info!(
            "Pipeline run {} complete: {} calls, {} tokens, {} records stored",
            run_id,
            summary.api_calls,
            summary.total_tokens,
            store.len()
        );
        debug!("{}", summary.display());

        Ok(PipelineOutput {
            record_id: run_id,
            persona_name: name.to_string(),
            personality_analysis: analysis.as_str().to_string(),
            transcript,
            review,
            refined_analysis: artifacts.refined_analysis,
            final_pitch: artifacts.final_pitch,
            cold_email: artifacts.cold_email,
            questions: generated_questions,
            rounds,
            metrics: summary,
        })
    }
}
