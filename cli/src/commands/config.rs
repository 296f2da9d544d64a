//! `buildhost config` — inspect the run configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate and show the configuration
    Show,
    /// Print the config file path in use
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => {
            println!("{}", app.config_store.path().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    app.renderer()
        .render_config(&config, app.config_store.path())?;
    Ok(ExitCode::SUCCESS)
}
