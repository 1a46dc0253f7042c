//! Meeting Transcript
//!
//! Append-only record of the simulated meeting. Turns are kept both as
//! structured values and as the rendered string every prompt receives, so
//! the two views can never drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the meeting produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Persona,
    Sales,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::Sales => "sales",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single spoken turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: AgentRole,
    pub speaker: String,
    pub text: String,
}

/// Chronological meeting transcript.
///
/// Rendered as the header followed by one `"\n{speaker}: {text}\n"` segment
/// per turn. There is no way to edit or remove a turn once pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    rendered: String,
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            rendered: header.into(),
            turns: Vec::new(),
        }
    }

    pub fn push(&mut self, role: AgentRole, speaker: &str, text: impl Into<String>) {
        let text = text.into();
        self.rendered.push('\n');
        self.rendered.push_str(speaker);
        self.rendered.push_str(": ");
        self.rendered.push_str(&text);
        self.rendered.push('\n');
        self.turns.push(Turn {
            role,
            speaker: speaker.to_string(),
            text,
        });
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Header plus one segment per turn
    pub fn segment_count(&self) -> usize {
        1 + self.turns.len()
    }

    pub fn turns_by(&self, role: AgentRole) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }

    pub fn into_string(self) -> String {
        self.rendered
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::simulation::TRANSCRIPT_HEADER;

    #[test]
    fn test_new_transcript_is_header_only() {
        let transcript = Transcript::new(TRANSCRIPT_HEADER);
        assert_eq!(transcript.as_str(), "Meeting Conversation Start:\n");
        assert_eq!(transcript.segment_count(), 1);
        assert!(transcript.turns().is_empty());
    }

    #[test]
    fn test_push_renders_speaker_segments() {
        let mut transcript = Transcript::new(TRANSCRIPT_HEADER);
        transcript.push(AgentRole::Persona, "Ada", "Hello there.");
        transcript.push(AgentRole::Sales, "BeGig Sales", "Welcome!");

        assert_eq!(
            transcript.as_str(),
            "Meeting Conversation Start:\n\nAda: Hello there.\n\nBeGig Sales: Welcome!\n"
        );
        assert_eq!(transcript.segment_count(), 3);
        assert_eq!(transcript.turns_by(AgentRole::Persona), 1);
        assert_eq!(transcript.turns()[1].speaker, "BeGig Sales");
    }

    #[test]
    fn test_push_only_extends() {
        let mut transcript = Transcript::new(TRANSCRIPT_HEADER);
        let before = transcript.as_str().to_string();
        transcript.push(AgentRole::Persona, "Ada", "");

        assert!(transcript.as_str().starts_with(&before));
        assert!(transcript.as_str().len() > before.len());
        assert_eq!(transcript.clone().into_string(), transcript.to_string());
    }
}
