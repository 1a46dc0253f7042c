use console::style;

use crate::meeting::{ConversationRecord, PipelineOutput};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Numbered artifact block
    pub fn artifact(&self, index: usize, title: &str, body: &str) {
        self.section(&format!("{}. {}", index, title));
        println!("{}", body.trim_end());
    }

    /// All six artifacts of a run, in presentation order
    pub fn pipeline_output(&self, output: &PipelineOutput) {
        self.header(&format!("Persona Simulation: {}", output.persona_name));
        for (i, (title, body)) in artifacts(output).into_iter().enumerate() {
            self.artifact(i + 1, title, body);
        }
        println!();
        println!(
            "{}",
            style(format!(
                "{} dynamic rounds · {} calls · {} tokens · {:.1}s",
                output.rounds,
                output.metrics.api_calls,
                output.metrics.total_tokens,
                output.metrics.total_duration_ms as f64 / 1000.0
            ))
            .dim()
        );
    }

    pub fn records(&self, records: &[ConversationRecord]) {
        self.header("Conversation Records");
        if records.is_empty() {
            self.info("No conversation records available. Run a simulation first.");
            return;
        }
        for (i, record) in records.iter().enumerate() {
            println!(
                "  {} {} {} {}",
                style(format!("#{}", i + 1)).cyan(),
                style(&record.persona_name).bold(),
                style(record.created_at.format("%Y-%m-%d %H:%M:%S")).dim(),
                style(record.id).dim()
            );
            println!("     {}", record.preview(72));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// (title, body) pairs in the order they are shown and written
pub fn artifacts(output: &PipelineOutput) -> [(&'static str, &str); 6] {
    [
        ("Detailed Personality Analysis", output.personality_analysis.as_str()),
        ("Final Conversation Log", output.transcript.as_str()),
        ("Conversation Review", output.review.as_str()),
        ("Refined Analysis & Pitch Strategy", output.refined_analysis.as_str()),
        ("Final Tailored Pitch", output.final_pitch.as_str()),
        ("Cold Email Draft", output.cold_email.as_str()),
    ]
}
