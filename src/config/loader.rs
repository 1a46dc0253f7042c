//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/personasim/config.toml)
//! 3. Project config (.personasim/config.toml)
//! 4. Environment variables (PERSONASIM_* prefix, `__` between sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, SimError};

/// Environment variable prefix, e.g. `PERSONASIM_LLM__MODEL`
const ENV_PREFIX: &str = "PERSONASIM_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| SimError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/personasim/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("personasim"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".personasim")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Print config file locations and whether they exist
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!("{}", toml::to_string_pretty(&config)?);
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the default global config, returning the directory
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            SimError::Config("Cannot determine global config directory".to_string())
        })?;

        Self::write_default(&global_dir, force)?;
        Ok(global_dir)
    }

    /// Write the default project config, returning the directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        Self::write_default(&project_dir, force)?;
        Ok(project_dir)
    }

    fn write_default(dir: &Path, force: bool) -> Result<()> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_toml())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    /// Default config content (TOML)
    fn default_config_toml() -> String {
        r#"# personasim configuration
# Project settings in .personasim/config.toml override the global file.

version = "1.0"

# Generation service. The API key is read from GOOGLE_API_KEY / OPENAI_API_KEY
# (a .env file in the working directory is honoured) unless set here.
[llm]
provider = "gemini"
model = "gemini-2.0-flash"
timeout_secs = 120
temperature = 0.7

[simulation]
max_rounds = 4
offering = "BeGig"

[review]
# focus = "sales strategy"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_config_toml()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.simulation.max_rounds, 4);
        assert!(config.review.focus.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[simulation]\nmax_rounds = 2\noffering = \"Acme Talent\"\n\n[review]\nfocus = \"communication\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.simulation.max_rounds, 2);
        assert_eq!(config.simulation.offering, "Acme Talent");
        assert_eq!(config.review.focus.as_deref(), Some("communication"));
        assert_eq!(config.llm.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 9.5\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_write_default_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("cfg");

        ConfigLoader::write_default(&dir, false).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::write_default(&dir, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::write_default(&dir, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[simulation]"));
    }

    #[test]
    fn test_env_override() {
        // SAFETY: no other test reads these variables
        unsafe {
            std::env::set_var("PERSONASIM_LLM__MODEL", "env-model");
            std::env::set_var("PERSONASIM_SIMULATION__MAX_ROUNDS", "2");
        }
        let config = ConfigLoader::load();
        unsafe {
            std::env::remove_var("PERSONASIM_LLM__MODEL");
            std::env::remove_var("PERSONASIM_SIMULATION__MAX_ROUNDS");
        }

        let config = config.unwrap();
        assert_eq!(config.llm.model, "env-model");
        assert_eq!(config.simulation.max_rounds, 2);
    }
}
