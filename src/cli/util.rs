//! CLI Common Utilities
//!
//! Shared initialization for commands that talk to the generation service.

use std::fs;
use std::path::Path;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::ai::{SharedProvider, create_provider};
use crate::config::{Config, ConfigLoader};
use crate::types::{Result, SimError};

/// Command execution context
///
/// Loaded configuration plus the provider built from it, with any
/// command-line provider/model overrides applied.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub provider: SharedProvider,
}

impl CommandContext {
    pub fn load(provider: Option<&str>, model: Option<&str>) -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(config, provider, model)
    }

    pub fn from_config(config: Config, provider: Option<&str>, model: Option<&str>) -> Result<Self> {
        let provider_config = config.llm.provider_config(provider, model);
        debug!("Provider config: {:?}", provider_config);
        let provider = create_provider(&provider_config)?;
        Ok(Self { config, provider })
    }
}

/// Single-threaded runtime; every generation call is awaited in sequence.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SimError::Io)
}

/// Read a UTF-8 text file, naming the path on failure
pub fn read_text_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        SimError::Config(format!("Cannot read '{}': {}", path.display(), e))
    })
}
