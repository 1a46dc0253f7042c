//! Conversation Review Agent
//!
//! Single-shot critique of a finished transcript. Independent of the
//! post-conversation chain: it needs nothing but the transcript.

use tracing::info;

use super::prompts;
use crate::ai::{PromptBindings, SharedProvider};
use crate::types::Result;

pub struct ReviewAgent {
    provider: SharedProvider,
}

impl ReviewAgent {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Review `transcript`, optionally emphasizing a focus area such as
    /// "sales strategy". Blank focus labels are ignored.
    pub async fn review(&self, transcript: &str, focus: Option<&str>) -> Result<String> {
        let focus_clause = match focus.filter(|f| !f.trim().is_empty()) {
            Some(focus) => {
                info!("Reviewing conversation with focus '{}'", focus);
                prompts::review_focus_clause()
                    .render(&PromptBindings::new().bind("focus", focus))?
            }
            None => {
                info!("Reviewing conversation");
                String::new()
            }
        };

        let prompt = prompts::conversation_review().render(
            &PromptBindings::new()
                .bind("focus_clause", focus_clause)
                .bind("transcript", transcript),
        )?;

        Ok(self.provider.generate(&prompt).await?.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::scripted::ScriptedProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_review_without_focus() {
        let provider = Arc::new(ScriptedProvider::new().on("Conversation Log", "REVIEW"));
        let agent = ReviewAgent::new(provider.clone());

        let review = agent.review("LOG", None).await.unwrap();

        assert_eq!(review, "REVIEW");
        let prompt = &provider.prompts()[0];
        assert!(!prompt.contains("Pay special attention"));
        assert!(prompt.contains("Conversation Log:\nLOG\n"));
        for topic in [
            "Communication Dynamics",
            "Effectiveness of Sales Approach",
            "Underlying Needs",
            "Missed Opportunities",
            "Potential Improvements",
        ] {
            assert!(prompt.contains(topic), "missing topic {topic}");
        }
    }

    #[tokio::test]
    async fn test_review_with_focus() {
        let provider = Arc::new(ScriptedProvider::new());
        let agent = ReviewAgent::new(provider.clone());

        agent.review("LOG", Some("sales strategy")).await.unwrap();

        assert!(provider.prompts()[0]
            .contains("Pay special attention to the sales strategy aspects of the conversation."));
    }

    #[tokio::test]
    async fn test_blank_focus_is_ignored() {
        let provider = Arc::new(ScriptedProvider::new());
        let agent = ReviewAgent::new(provider.clone());

        agent.review("LOG", Some("   ")).await.unwrap();

        assert!(!provider.prompts()[0].contains("Pay special attention"));
    }
}
