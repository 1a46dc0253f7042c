//! Review Command
//!
//! Runs the conversation review agent over a saved transcript.
//!
//! Usage:
//!   personasim review --transcript meeting.txt [--focus "sales strategy"]

use std::path::Path;

use crate::cli::{CommandContext, Output, read_text_input, runtime};
use crate::meeting::ReviewAgent;
use crate::types::Result;

pub fn run(
    transcript: &Path,
    focus: Option<String>,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<()> {
    let text = read_text_input(transcript)?;
    let ctx = CommandContext::load(provider, model)?;
    let focus = focus.or_else(|| ctx.config.review.focus.clone());

    let agent = ReviewAgent::new(ctx.provider.clone());
    let review = runtime()?.block_on(agent.review(&text, focus.as_deref()))?;

    let out = Output::new();
    out.section(&format!("Conversation Review: {}", transcript.display()));
    println!("{}", review.trim_end());
    Ok(())
}
