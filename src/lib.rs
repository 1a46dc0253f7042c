//! personasim - AI Persona Sales-Meeting Simulator
//!
//! Builds a personality profile for a real person from their biography,
//! simulates a sales meeting between that persona and a sales representative,
//! and turns the transcript into a review, a refined analysis, a tailored
//! pitch and a cold email.
//!
//! ## Quick Start
//!
//! ```ignore
//! use personasim::{ConfigLoader, InMemoryRecordStore, MeetingPipeline, PipelineSettings,
//!     SimulationRequest};
//! use personasim::ai::create_provider;
//!
//! let config = ConfigLoader::load()?;
//! let provider = create_provider(&config.llm.provider_config(None, None))?;
//! let pipeline = MeetingPipeline::new(provider, PipelineSettings::from_config(&config));
//! let mut store = InMemoryRecordStore::new();
//! let output = pipeline
//!     .run(&SimulationRequest::new("Ada", "Mathematician and writer."), &mut store)
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: generation-service providers, prompt templates, run metrics
//! - [`meeting`]: agents, simulator, analyzers, records and the pipeline
//! - [`config`]: layered configuration
//! - [`cli`]: command handlers and console output

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod meeting;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::{ErrorCategory, LlmError, Result, SimError};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use meeting::{
    ConversationRecord, ConversationSimulator, InMemoryRecordStore, MeetingPipeline,
    PipelineOutput, PipelineSettings, RecordStore, SimulationRequest, Transcript,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{GenerationResult, LlmProvider, LlmResponse, MetricsCollector, PromptTemplate};
