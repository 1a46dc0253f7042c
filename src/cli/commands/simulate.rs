//! Simulate Command
//!
//! Runs the full meeting pipeline for one persona.
//!
//! Usage:
//!   personasim simulate --name "Ada" --context-file bio.txt [--rounds 4]
//!       [--focus "sales strategy"] [--runs 2] [--records] [--format json]
//!       [--output out/] [--provider gemini] [--model gemini-2.0-flash]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{info, warn};

use super::OutputFormat;
use crate::ai::SharedProvider;
use crate::cli::ui::output::artifacts;
use crate::cli::{CommandContext, Output, read_text_input, runtime};
use crate::meeting::{
    InMemoryRecordStore, MeetingPipeline, PipelineOutput, PipelineSettings, RecordStore,
    SimulationRequest,
};
use crate::types::{Result, SimError};

/// Simulate command options (consolidated parameters)
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub name: String,
    /// Inline persona context
    pub context: Option<String>,
    /// File holding the persona context
    pub context_file: Option<PathBuf>,
    /// Dynamic round budget override
    pub rounds: Option<usize>,
    /// Review focus override
    pub focus: Option<String>,
    /// Number of pipeline runs into the same record store
    pub runs: usize,
    /// List stored records afterwards
    pub show_records: bool,
    pub format: OutputFormat,
    /// Directory to write artifacts into
    pub output: Option<PathBuf>,
    /// LLM provider override
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
}

pub fn run(options: SimulateOptions) -> Result<()> {
    if options.runs == 0 {
        return Err(SimError::Config("--runs must be at least 1".to_string()));
    }
    let context = resolve_context(options.context.as_deref(), options.context_file.as_deref())?;

    let mut ctx = CommandContext::load(options.provider.as_deref(), options.model.as_deref())?;
    if let Some(rounds) = options.rounds {
        ctx.config.simulation.max_rounds = rounds;
        ctx.config.validate()?;
    }

    let pipeline = MeetingPipeline::new(ctx.provider.clone(), PipelineSettings::from_config(&ctx.config));
    let request = SimulationRequest::new(options.name.as_str(), context).with_focus(options.focus.clone());
    let mut store = InMemoryRecordStore::new();
    let out = Output::new();
    let rt = runtime()?;

    rt.block_on(preflight(&ctx.provider))?;

    let runs = options.runs;
    let mut outputs = Vec::with_capacity(runs);

    for run_index in 0..runs {
        if runs > 1 {
            info!("Simulation run {}/{}", run_index + 1, runs);
        }

        let output = rt.block_on(pipeline.run(&request, &mut store))?;

        if let Some(dir) = &options.output {
            let written = write_artifacts(dir, &output)?;
            info!("Wrote {} artifacts to {}", written.len(), dir.display());
        }

        if options.format == OutputFormat::Text {
            out.pipeline_output(&output);
        }
        outputs.push(output);
    }

    match options.format {
        OutputFormat::Json => {
            let mut body = json!({ "runs": outputs });
            if options.show_records {
                body["records"] = serde_json::to_value(store.records())?;
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            if options.show_records {
                out.records(store.records());
            }
            if let Some(dir) = &options.output {
                out.success(&format!("Artifacts written to {}", dir.display()));
            }
        }
    }

    Ok(())
}

/// Health check that only warns. Logged to stderr so JSON stdout stays clean.
async fn preflight(provider: &SharedProvider) -> Result<bool> {
    let healthy = provider.health_check().await?;
    if !healthy {
        warn!(
            "{} ({}) did not answer the health check; the run may fail",
            provider.name(),
            provider.model()
        );
    }
    Ok(healthy)
}

/// Exactly one of inline text or a file
fn resolve_context(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(text), None) => Ok(text.to_string()),
        (None, Some(path)) => read_text_input(path),
        (Some(_), Some(_)) => Err(SimError::Config(
            "Use either --context or --context-file, not both".to_string(),
        )),
        (None, None) => Err(SimError::Config(
            "Persona context is required: pass --context or --context-file".to_string(),
        )),
    }
}

/// Write each artifact as markdown under `dir/<record id>/`
pub fn write_artifacts(dir: &Path, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
    let run_dir = dir.join(output.record_id.to_string());
    fs::create_dir_all(&run_dir)?;

    let mut written = Vec::new();
    for (i, (title, body)) in artifacts(output).into_iter().enumerate() {
        let path = run_dir.join(format!("{:02}-{}.md", i + 1, slug(title)));
        fs::write(&path, format!("# {}\n\n{}\n", title, body.trim_end()))?;
        written.push(path);
    }
    Ok(written)
}

fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
