//! Config show/validate/path.

use anyhow::Result;
use clap::Subcommand;

use rentadmin_core::config::Config;

use super::load_config;
use crate::ui;

/// Config actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Validate the config file
    Validate,
    /// Print the config file path
    Path,
}

/// Run a config action.
pub fn run_config(action: ConfigAction) -> Result<bool> {
    match action {
        ConfigAction::Show => {
            let config = load_config()?;
            ui::json(&config)?;
            Ok(true)
        }
        ConfigAction::Validate => {
            let path = Config::default_path();
            if !path.exists() {
                ui::warning(&format!("Config file not found: {}", path.display()));
                ui::info("Defaults are in effect");
                return Ok(true);
            }
            match Config::load(&path) {
                Ok(_) => {
                    ui::success("Configuration is valid");
                    Ok(true)
                }
                Err(e) => {
                    ui::error(&format!("Invalid configuration: {e}"));
                    Ok(false)
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
            Ok(true)
        }
    }
}
