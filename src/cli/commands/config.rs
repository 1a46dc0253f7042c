//! Config Command
//!
//! Manage personasim configuration.
//!
//! Usage:
//!   personasim config show [-g] [-f json]
//!   personasim config path
//!   personasim config init [-g] [--force]

use super::OutputFormat;
use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: OutputFormat) -> Result<()> {
    if !global {
        // Merged effective config
        return ConfigLoader::show_config(format == OutputFormat::Json);
    }

    match ConfigLoader::global_config_path() {
        Some(global_path) if global_path.exists() => {
            let content = std::fs::read_to_string(&global_path)?;
            println!("# Global Config: {}\n", global_path.display());
            println!("{}", content);
        }
        Some(_) => {
            println!("No global config found.");
            println!("Run 'personasim config init --global' to create one.");
        }
        None => println!("Cannot determine global config directory."),
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let out = Output::new();
    if global {
        let dir = ConfigLoader::init_global(force)?;
        out.success("Initialized global configuration");
        println!("  Directory: {}", dir.display());
        if let Some(config_path) = ConfigLoader::global_config_path() {
            println!("  Config:    {}", config_path.display());
        }
    } else {
        let dir = ConfigLoader::init_project(force)?;
        out.success("Initialized project configuration");
        println!("  Directory: {}", dir.display());
        println!(
            "  Config:    {}",
            ConfigLoader::project_config_path().display()
        );
    }
    Ok(())
}
