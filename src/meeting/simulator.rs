//! Conversation Simulator
//!
//! Drives one simulated meeting:
//!
//! ```text
//! Init → PersonaGreeting → SalesGreeting → PersonaPreference → SalesObjection
//!      → DynamicRound(0..k) → Done
//! ```
//!
//! The four scripted turns always run exactly once. Dynamic questions are
//! generated once, after the objection turn, and `k = min(max_rounds, questions)`
//! rounds follow. Each round is a persona turn asking the question verbatim
//! and a sales turn answering it under a rotating topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::agents::ConversationAgent;
use super::prompts;
use super::questions::QuestionSource;
use super::transcript::Transcript;
use crate::ai::PromptBindings;
use crate::constants::simulation::{
    DEFAULT_MAX_ROUNDS, DEFAULT_OFFERING, DEFAULT_PERSONA_NAME, TRANSCRIPT_HEADER,
};
use crate::types::Result;

/// Simulation state, strictly ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationPhase {
    Init,
    PersonaGreeting,
    SalesGreeting,
    PersonaPreference,
    SalesObjection,
    DynamicRound(usize),
    Done,
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::PersonaGreeting => write!(f, "persona_greeting"),
            Self::SalesGreeting => write!(f, "sales_greeting"),
            Self::PersonaPreference => write!(f, "persona_preference"),
            Self::SalesObjection => write!(f, "sales_objection"),
            Self::DynamicRound(i) => write!(f, "dynamic_round({})", i),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Topic the sales answer is steered towards in a dynamic round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesTopic {
    AiMatching,
    SuccessStory,
    Compliance,
}

impl SalesTopic {
    /// Fixed rotation, independent of the question text
    pub fn for_round(round: usize) -> Self {
        match round {
            0 => Self::AiMatching,
            1 => Self::SuccessStory,
            2 => Self::Compliance,
            _ => Self::SuccessStory,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiMatching => "ai_matching",
            Self::SuccessStory => "success_story",
            Self::Compliance => "compliance",
        }
    }
}

impl fmt::Display for SalesTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub max_rounds: usize,
    pub persona_name: String,
    pub offering: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            persona_name: DEFAULT_PERSONA_NAME.to_string(),
            offering: DEFAULT_OFFERING.to_string(),
        }
    }
}

/// Result of one simulated meeting
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub transcript: Transcript,
    /// Every generated question, including any beyond the round budget
    pub questions: Vec<String>,
    pub rounds: usize,
    pub phases: Vec<SimulationPhase>,
}

pub struct ConversationSimulator {
    settings: SimulationSettings,
}

impl ConversationSimulator {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    pub async fn run(
        &self,
        persona: &dyn ConversationAgent,
        sales: &dyn ConversationAgent,
        questions: &dyn QuestionSource,
    ) -> Result<SimulationOutcome> {
        let name = &self.settings.persona_name;
        info!(
            "Virtual meeting begins: {} with {}",
            name,
            sales.speaker()
        );

        let mut run = SimulationRun::new();

        run.enter(SimulationPhase::PersonaGreeting);
        run.turn(persona, prompts::PERSONA_GREETING_QUERY).await?;

        run.enter(SimulationPhase::SalesGreeting);
        run.turn(sales, prompts::SALES_GREETING_QUERY).await?;

        run.enter(SimulationPhase::PersonaPreference);
        run.turn(persona, prompts::PERSONA_PREFERENCE_QUERY).await?;

        run.enter(SimulationPhase::SalesObjection);
        let objection = prompts::sales_objection_query().render(
            &PromptBindings::new().bind("offering", self.settings.offering.as_str()),
        )?;
        run.turn(sales, &objection).await?;

        let generated = questions
            .generate(name, run.transcript.as_str())
            .await?;

        // k never exceeds the question count, so take(k) cannot run past the end
        let k = self.settings.max_rounds.min(generated.len());
        debug!(
            "{} dynamic questions generated, running {} rounds",
            generated.len(),
            k
        );

        let answer_template = prompts::dynamic_answer_query();
        for (i, question) in generated.iter().take(k).enumerate() {
            run.enter(SimulationPhase::DynamicRound(i));
            run.turn(persona, question).await?;

            let topic = SalesTopic::for_round(i);
            let query = answer_template.render(
                &PromptBindings::new()
                    .bind("question", question.as_str())
                    .bind("topic", topic.as_str()),
            )?;
            run.turn(sales, &query).await?;
        }

        run.enter(SimulationPhase::Done);
        info!(
            "Virtual meeting finished: {} turns over {} dynamic rounds",
            run.transcript.turns().len(),
            k
        );

        Ok(SimulationOutcome {
            transcript: run.transcript,
            questions: generated,
            rounds: k,
            phases: run.phases,
        })
    }
}

/// Mutable state owned by a single `run` call
struct SimulationRun {
    transcript: Transcript,
    phases: Vec<SimulationPhase>,
}

impl SimulationRun {
    fn new() -> Self {
        Self {
            transcript: Transcript::new(TRANSCRIPT_HEADER),
            phases: vec![SimulationPhase::Init],
        }
    }

    fn enter(&mut self, phase: SimulationPhase) {
        if let Some(previous) = self.phases.last() {
            debug!("Simulation phase: {} -> {}", previous, phase);
        }
        self.phases.push(phase);
    }

    async fn turn(&mut self, agent: &dyn ConversationAgent, query: &str) -> Result<()> {
        let reply = agent.respond(self.transcript.as_str(), query).await?;
        self.transcript.push(agent.role(), agent.speaker(), reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::scripted::ScriptedProvider;
    use crate::meeting::questions::DynamicQuestionGenerator;
    use crate::meeting::transcript::AgentRole;
    use crate::types::{ErrorCategory, LlmError};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<(AgentRole, String, String)>>>;

    /// Agent that records (role, transcript, query) for every call
    struct RecordingAgent {
        role: AgentRole,
        speaker: String,
        log: CallLog,
        fail_on: Option<String>,
    }

    impl RecordingAgent {
        fn new(role: AgentRole, speaker: &str, log: CallLog) -> Self {
            Self {
                role,
                speaker: speaker.to_string(),
                log,
                fail_on: None,
            }
        }

        fn failing_on(mut self, needle: &str) -> Self {
            self.fail_on = Some(needle.to_string());
            self
        }
    }

    #[async_trait]
    impl ConversationAgent for RecordingAgent {
        async fn respond(&self, transcript: &str, query: &str) -> Result<String> {
            let mut log = self.log.lock().unwrap();
            log.push((self.role, transcript.to_string(), query.to_string()));
            if let Some(needle) = &self.fail_on
                && query.contains(needle.as_str())
            {
                return Err(LlmError::new(ErrorCategory::Transient, "unavailable").into());
            }
            Ok(format!("{} reply {}", self.speaker, log.len()))
        }

        fn role(&self) -> AgentRole {
            self.role
        }

        fn speaker(&self) -> &str {
            &self.speaker
        }
    }

    struct FixedQuestions {
        questions: Vec<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl FixedQuestions {
        fn new(count: usize) -> Self {
            Self {
                questions: (1..=count).map(|i| format!("Question {}?", i)).collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QuestionSource for FixedQuestions {
        async fn generate(&self, persona_name: &str, transcript: &str) -> Result<Vec<String>> {
            self.seen
                .lock()
                .unwrap()
                .push((persona_name.to_string(), transcript.to_string()));
            Ok(self.questions.clone())
        }
    }

    fn settings(name: &str, max_rounds: usize) -> SimulationSettings {
        SimulationSettings {
            max_rounds,
            persona_name: name.to_string(),
            offering: "BeGig".to_string(),
        }
    }

    fn agents(log: &CallLog, name: &str) -> (RecordingAgent, RecordingAgent) {
        (
            RecordingAgent::new(AgentRole::Persona, name, log.clone()),
            RecordingAgent::new(AgentRole::Sales, "BeGig Sales", log.clone()),
        )
    }

    async fn simulate(
        max_rounds: usize,
        question_count: usize,
    ) -> (Result<SimulationOutcome>, Vec<(AgentRole, String, String)>) {
        let log: CallLog = Arc::default();
        let (persona, sales) = agents(&log, "Ada");
        let questions = FixedQuestions::new(question_count);
        let result = ConversationSimulator::new(settings("Ada", max_rounds))
            .run(&persona, &sales, &questions)
            .await;
        let calls = log.lock().unwrap().clone();
        (result, calls)
    }

    #[test]
    fn test_topic_rotation() {
        let topics: Vec<&str> = (0..6).map(|i| SalesTopic::for_round(i).as_str()).collect();
        assert_eq!(
            topics,
            vec![
                "ai_matching",
                "success_story",
                "compliance",
                "success_story",
                "success_story",
                "success_story"
            ]
        );
    }

    #[tokio::test]
    async fn test_two_rounds_with_three_questions() {
        let (result, calls) = simulate(2, 3).await;
        let outcome = result.unwrap();

        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.questions.len(), 3);
        assert_eq!(outcome.transcript.segment_count(), 9);
        assert_eq!(calls.len(), 8);

        assert_eq!(calls[4].0, AgentRole::Persona);
        assert_eq!(calls[4].2, "Question 1?");
        assert!(calls[5].2.contains("'Question 1?'"));
        assert!(calls[5].2.ends_with("related to ai_matching."));
        assert_eq!(calls[6].2, "Question 2?");
        assert!(calls[7].2.ends_with("related to success_story."));

        assert_eq!(
            outcome.phases,
            vec![
                SimulationPhase::Init,
                SimulationPhase::PersonaGreeting,
                SimulationPhase::SalesGreeting,
                SimulationPhase::PersonaPreference,
                SimulationPhase::SalesObjection,
                SimulationPhase::DynamicRound(0),
                SimulationPhase::DynamicRound(1),
                SimulationPhase::Done,
            ]
        );

        let rendered = outcome.transcript.as_str();
        assert!(rendered.starts_with("Meeting Conversation Start:\n\nAda: Ada reply 1\n"));
        assert!(rendered.ends_with("\nBeGig Sales: BeGig Sales reply 8\n"));
    }

    #[tokio::test]
    async fn test_scripted_opening_is_fixed() {
        let (result, calls) = simulate(4, 0).await;
        result.unwrap();

        let roles: Vec<AgentRole> = calls.iter().map(|c| c.0).collect();
        assert_eq!(
            roles,
            vec![
                AgentRole::Persona,
                AgentRole::Sales,
                AgentRole::Persona,
                AgentRole::Sales
            ]
        );
        assert_eq!(calls[0].2, prompts::PERSONA_GREETING_QUERY);
        assert_eq!(calls[1].2, prompts::SALES_GREETING_QUERY);
        assert_eq!(calls[2].2, prompts::PERSONA_PREFERENCE_QUERY);
        assert!(calls[3].2.contains("BeGig's hybrid model"));
    }

    #[tokio::test]
    async fn test_zero_questions_goes_straight_to_done() {
        let (result, calls) = simulate(4, 0).await;
        let outcome = result.unwrap();

        assert_eq!(outcome.rounds, 0);
        assert_eq!(calls.len(), 4);
        assert_eq!(outcome.transcript.segment_count(), 5);
        assert_eq!(
            &outcome.phases[outcome.phases.len() - 2..],
            &[SimulationPhase::SalesObjection, SimulationPhase::Done]
        );
    }

    #[tokio::test]
    async fn test_non_text_question_response_skips_dynamic_rounds() {
        let provider = Arc::new(ScriptedProvider::new().on_opaque(
            "open-ended",
            serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        ));
        let generator = DynamicQuestionGenerator::new(provider, "BeGig");
        let log: CallLog = Arc::default();
        let (persona, sales) = agents(&log, "Ada");

        let outcome = ConversationSimulator::new(settings("Ada", 4))
            .run(&persona, &sales, &generator)
            .await
            .unwrap();

        assert!(outcome.questions.is_empty());
        assert_eq!(outcome.rounds, 0);
        assert_eq!(log.lock().unwrap().len(), 4);
        assert!(!outcome.transcript.as_str().contains("promptFeedback"));
        assert_eq!(
            &outcome.phases[outcome.phases.len() - 2..],
            &[SimulationPhase::SalesObjection, SimulationPhase::Done]
        );
    }

    #[tokio::test]
    async fn test_questions_generated_once_after_objection() {
        let log: CallLog = Arc::default();
        let (persona, sales) = agents(&log, "Ada");
        let questions = FixedQuestions::new(5);

        let outcome = ConversationSimulator::new(settings("Ada", 4))
            .run(&persona, &sales, &questions)
            .await
            .unwrap();

        let seen = questions.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Ada");
        assert!(seen[0].1.ends_with("BeGig Sales: BeGig Sales reply 4\n"));
        assert_eq!(outcome.rounds, 4);
        assert_eq!(outcome.questions.len(), 5);
    }

    #[tokio::test]
    async fn test_transcript_grows_by_prefix_extension() {
        let (result, calls) = simulate(3, 3).await;
        result.unwrap();

        assert_eq!(calls[0].1, TRANSCRIPT_HEADER);
        for pair in calls.windows(2) {
            let (earlier, later) = (&pair[0].1, &pair[1].1);
            assert!(later.starts_with(earlier.as_str()));
            assert!(later.len() > earlier.len());
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_turns() {
        let log: CallLog = Arc::default();
        let persona = RecordingAgent::new(AgentRole::Persona, "Ada", log.clone());
        let sales = RecordingAgent::new(AgentRole::Sales, "BeGig Sales", log.clone())
            .failing_on("hybrid model");
        let questions = FixedQuestions::new(3);

        let err = ConversationSimulator::new(settings("Ada", 2))
            .run(&persona, &sales, &questions)
            .await
            .unwrap_err();

        assert_eq!(err.llm_category(), Some(ErrorCategory::Transient));
        assert_eq!(log.lock().unwrap().len(), 4);
        assert!(questions.seen.lock().unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_rounds_are_min_of_budget_and_questions(
            max_rounds in 0usize..8,
            question_count in 0usize..8,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let (result, calls) = runtime.block_on(simulate(max_rounds, question_count));
            let outcome = result.unwrap();
            let k = max_rounds.min(question_count);

            prop_assert_eq!(outcome.rounds, k);
            prop_assert_eq!(calls.len(), 4 + 2 * k);
            prop_assert_eq!(outcome.transcript.segment_count(), 5 + 2 * k);
            prop_assert_eq!(outcome.transcript.turns_by(AgentRole::Persona), 2 + k);
        }
    }
}
