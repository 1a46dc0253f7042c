use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use personasim::cli::Output;
use personasim::cli::commands::{self, OutputFormat};
use personasim::cli::commands::simulate::SimulateOptions;
use personasim::constants::simulation::DEFAULT_PERSONA_NAME;

#[derive(Parser)]
#[command(name = "personasim")]
#[command(
    version,
    about = "Simulate a sales meeting with an AI persona and draft tailored outreach"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a persona, simulate the meeting and draft pitch artifacts
    Simulate {
        #[arg(long, short, default_value = DEFAULT_PERSONA_NAME, help = "Persona name")]
        name: String,
        #[arg(long, conflicts_with = "context_file", help = "Persona context (biography text)")]
        context: Option<String>,
        #[arg(long, help = "File containing the persona context")]
        context_file: Option<PathBuf>,
        #[arg(long, short, help = "Maximum dynamic question rounds")]
        rounds: Option<usize>,
        #[arg(long, help = "Review focus area (e.g. 'sales strategy')")]
        focus: Option<String>,
        #[arg(
            long,
            default_value = "1",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
            help = "Number of simulation runs"
        )]
        runs: usize,
        #[arg(long, help = "List stored conversation records afterwards")]
        records: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
        #[arg(long, short, help = "Directory to write artifacts as markdown")]
        output: Option<PathBuf>,
        #[arg(long, help = "LLM provider (gemini, openai, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Review a saved conversation transcript
    Review {
        #[arg(long, short, help = "Transcript file")]
        transcript: PathBuf,
        #[arg(long, help = "Review focus area")]
        focus: Option<String>,
        #[arg(long, help = "LLM provider (gemini, openai, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mpersonasim encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    // GOOGLE_API_KEY and friends may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // stderr keeps stdout clean for artifacts and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Simulate {
            name,
            context,
            context_file,
            rounds,
            focus,
            runs,
            records,
            format,
            output,
            provider,
            model,
        } => {
            commands::simulate::run(SimulateOptions {
                name,
                context,
                context_file,
                rounds,
                focus,
                runs,
                show_records: records,
                format,
                output,
                provider,
                model,
            })?;
        }
        Commands::Review {
            transcript,
            focus,
            provider,
            model,
        } => {
            commands::review::run(&transcript, focus, provider.as_deref(), model.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                commands::config::show(global, format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
