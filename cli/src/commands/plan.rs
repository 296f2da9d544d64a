//! `buildhost plan` — list the remote commands a run would issue.
//!
//! Drives the real pipeline against a recording session, so the list cannot
//! drift from what `buildhost run` does.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::pipeline::{self, RunSettings};
use crate::domain::{PlannedCommand, ProvisionConfig, Secret};
use crate::infra::dry_run::DryRunConnector;
use crate::output::reporter::SilentReporter;

/// Run `buildhost plan`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let plan = plan_for(config)?;
    app.renderer().render_plan(&plan)?;
    Ok(ExitCode::SUCCESS)
}

/// The ordered commands a run with `config` would send.
///
/// # Errors
///
/// Returns an error if a credential prompt pattern is invalid.
pub fn plan_for(config: ProvisionConfig) -> Result<Vec<PlannedCommand>> {
    let settings = RunSettings {
        config,
        host_password: Secret::default(),
        repo_password: Secret::default(),
    };
    let connector = DryRunConnector::new();
    pipeline::run(&connector, &settings, &SilentReporter)?;
    Ok(connector.planned())
}
