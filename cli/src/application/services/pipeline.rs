//! The whole run: connect, provision, fetch and build, configure git, publish.
//!
//! Strictly linear. The first failing step ends the run; the session is
//! dropped (and so closed) on every path out of [`run`].

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{ProgressReporter, SecretPrompter, SessionConnector};
use crate::application::services::{git_config, project, provision, publish};
use crate::domain::secret::{HOST_PASSWORD_PROMPT, REPO_PASSWORD_PROMPT};
use crate::domain::{ProvisionConfig, Secret};

/// Everything one run needs, fixed before it starts.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: ProvisionConfig,
    /// Password for the SSH user, also used for `sudo`.
    pub host_password: Secret,
    /// Password for the git remote.
    pub repo_password: Secret,
}

impl RunSettings {
    /// Ask for both passwords up front, host first.
    ///
    /// # Errors
    ///
    /// Returns an error if either prompt cannot be read.
    pub fn collect(config: ProvisionConfig, prompter: &impl SecretPrompter) -> Result<Self> {
        let host_password = prompter.password(HOST_PASSWORD_PROMPT)?;
        let repo_password = prompter.password(REPO_PASSWORD_PROMPT)?;
        Ok(Self {
            config,
            host_password,
            repo_password,
        })
    }
}

/// Milestones of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Start,
    Connected,
    Provisioned,
    FetchedAndBuilt,
    GitConfigured,
    Published,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Connected => "connected",
            Self::Provisioned => "provisioned",
            Self::FetchedAndBuilt => "fetched and built",
            Self::GitConfigured => "git configured",
            Self::Published => "published",
        };
        f.write_str(name)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub stage: Stage,
    pub project_path: String,
}

/// Execute the full run against one host.
///
/// # Errors
///
/// Returns the first error raised by any step. Remote changes made before
/// the failure are left as they are.
pub fn run<C: SessionConnector>(
    connector: &C,
    settings: &RunSettings,
    reporter: &impl ProgressReporter,
) -> Result<RunReport> {
    let mut stage = Stage::Start;
    let result = run_stages(connector, settings, reporter, &mut stage);
    if let Err(e) = &result {
        tracing::info!(last_stage = %stage, error = %format!("{e:#}"), "run aborted");
    }
    result
}

fn run_stages<C: SessionConnector>(
    connector: &C,
    settings: &RunSettings,
    reporter: &impl ProgressReporter,
    stage: &mut Stage,
) -> Result<RunReport> {
    let config = &settings.config;
    let host = &config.server_credentials;

    reporter.step(&format!(
        "connecting to {}@{}:{}...",
        host.username, host.host, host.port
    ));
    let session = connector.connect(host, &settings.host_password)?;
    reached(stage, Stage::Connected);

    provision::install_packages(&session, &config.packages, reporter)?;
    provision::install_nodejs(&session, &config.packages.nodejs_version, reporter)?;
    reached(stage, Stage::Provisioned);

    let project_path = project::setup_project(
        &session,
        &config.git.remote,
        &settings.repo_password,
        &config.project,
        reporter,
    )?;
    reached(stage, Stage::FetchedAndBuilt);

    git_config::configure_git(&session, &project_path, &config.git.identity, reporter)?;
    reached(stage, Stage::GitConfigured);

    publish::push_build(
        &session,
        &project_path,
        &config.git.remote,
        &settings.repo_password,
        reporter,
    )?;
    reached(stage, Stage::Published);

    Ok(RunReport {
        stage: *stage,
        project_path,
    })
}

fn reached(stage: &mut Stage, next: Stage) {
    tracing::info!(stage = %next, "stage reached");
    *stage = next;
}
