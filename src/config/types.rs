//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::ai::provider::ProviderConfig;
use crate::constants::{llm, network, simulation};
use crate::types::{Result, SimError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Generation service settings
    pub llm: LlmConfig,

    /// Meeting simulation settings
    pub simulation: SimulationConfig,

    /// Conversation review settings
    pub review: ReviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            simulation: SimulationConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SimError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(SimError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(SimError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.simulation.max_rounds > simulation::MAX_ROUNDS_CEILING {
            return Err(SimError::Config(format!(
                "simulation.max_rounds must be at most {}, got {}",
                simulation::MAX_ROUNDS_CEILING,
                self.simulation.max_rounds
            )));
        }

        if self.simulation.offering.trim().is_empty() {
            return Err(SimError::Config(
                "simulation.offering must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// API keys are never serialized back out (`config show` stays safe to paste).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "gemini", "openai", "ollama"
    pub provider: String,

    /// Model name
    pub model: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate per call
    pub max_tokens: usize,

    /// Custom endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: llm::DEFAULT_PROVIDER.to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: llm::DEFAULT_TEMPERATURE,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
            api_base: None,
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Provider settings, with optional CLI overrides for provider and model
    pub fn provider_config(&self, provider: Option<&str>, model: Option<&str>) -> ProviderConfig {
        let provider_name = provider.unwrap_or(&self.provider).to_string();
        // A configured model belongs to the configured provider; switching
        // providers on the command line falls back to that provider's default.
        let model = match (model, provider) {
            (Some(m), _) => Some(m.to_string()),
            (None, Some(p)) if p != self.provider => None,
            (None, _) => Some(self.model.clone()),
        };

        ProviderConfig {
            provider: provider_name,
            model,
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

// =============================================================================
// Simulation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Upper bound on dynamic question/answer rounds
    pub max_rounds: usize,

    /// Name of the offering the sales representative pitches
    pub offering: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_rounds: simulation::DEFAULT_MAX_ROUNDS,
            offering: simulation::DEFAULT_OFFERING.to_string(),
        }
    }
}

// =============================================================================
// Review Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Area the review agent pays special attention to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.simulation.max_rounds, 4);
        assert_eq!(config.simulation.offering, "BeGig");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.max_rounds = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.offering = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rounds_is_valid() {
        let mut config = Config::default();
        config.simulation.max_rounds = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("secret-key".to_string());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret-key"));
        assert!(format!("{:?}", config.llm).contains("[REDACTED]"));
    }

    #[test]
    fn test_provider_config_overrides() {
        let llm = LlmConfig::default();

        let same = llm.provider_config(None, None);
        assert_eq!(same.provider, "gemini");
        assert_eq!(same.model.as_deref(), Some("gemini-2.0-flash"));

        let switched = llm.provider_config(Some("ollama"), None);
        assert_eq!(switched.provider, "ollama");
        assert_eq!(switched.model, None);

        let explicit = llm.provider_config(Some("openai"), Some("gpt-4o-mini"));
        assert_eq!(explicit.model.as_deref(), Some("gpt-4o-mini"));
    }
}
