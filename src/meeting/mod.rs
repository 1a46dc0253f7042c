//! Meeting Orchestration
//!
//! The core of the simulator: role agents built from prompt templates, the
//! scripted-then-dynamic meeting loop, and the analyzers that turn a finished
//! transcript into sales artifacts.
//!
//! ## Flow
//!
//! ```text
//! PersonalityAnalyzer ──► persona agent ─┐
//!                         sales agent ───┼─► ConversationSimulator ─► Transcript
//! DynamicQuestionGenerator ──────────────┘            │
//!                                                     ├─► PostConversationAnalyzer
//!                                                     └─► ReviewAgent
//!                                                              │
//!                                                     ConversationRecord ─► RecordStore
//! ```

pub mod agents;
pub mod analysis;
pub mod pipeline;
pub mod prompts;
pub mod questions;
pub mod record;
pub mod review;
pub mod simulator;
pub mod transcript;

pub use agents::{ConversationAgent, RoleAgent, persona_agent, sales_agent};
pub use analysis::{PersonalityAnalysis, PersonalityAnalyzer, PitchArtifacts, PostConversationAnalyzer};
pub use pipeline::{MeetingPipeline, PipelineOutput, PipelineSettings, SimulationRequest};
pub use questions::{DynamicQuestionGenerator, QuestionSource, parse_questions};
pub use record::{ConversationRecord, InMemoryRecordStore, RecordStore};
pub use review::ReviewAgent;
pub use simulator::{
    ConversationSimulator, SalesTopic, SimulationOutcome, SimulationPhase, SimulationSettings,
};
pub use transcript::{AgentRole, Transcript, Turn};
