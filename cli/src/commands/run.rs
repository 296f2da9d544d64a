//! `buildhost run` — provision the host, build the project, push the build.
//!
//! Every failure after the passwords are read lands in one handler that
//! prints a single line on stdout and exits normally.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::pipeline::{self, RunSettings};
use crate::domain::RemoteError;
use crate::infra::secrets::TerminalPrompter;
use crate::infra::ssh::SshConnector;
use crate::output::json::format_error;
use crate::output::reporter::SilentReporter;

/// Failure category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Connection,
    Other,
}

impl FailureKind {
    /// Stable code used in `--json` error objects.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Connection => "connection",
            Self::Other => "remote",
        }
    }
}

/// Classify a run failure and produce its one-line message.
#[must_use]
pub fn describe_failure(err: &anyhow::Error) -> (FailureKind, String) {
    let remote = err.chain().find_map(|c| c.downcast_ref::<RemoteError>());
    match remote {
        Some(e @ RemoteError::Authentication { .. }) => (FailureKind::Authentication, e.to_string()),
        Some(e @ RemoteError::Connection { .. }) => (FailureKind::Connection, e.to_string()),
        _ => (FailureKind::Other, format!("{err:#}")),
    }
}

/// Run `buildhost run`.
///
/// # Errors
///
/// Returns an error only if the configuration or passwords cannot be read;
/// failures during the run itself are reported and yield success.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let settings = RunSettings::collect(config, &TerminalPrompter::new())?;
    let connector = SshConnector::from_config(&settings.config.ssh, app.echo_remote_output());

    let result = if app.is_json() {
        pipeline::run(&connector, &settings, &SilentReporter)
    } else {
        pipeline::run(&connector, &settings, &app.terminal_reporter())
    };

    match result {
        Ok(report) => app.renderer().render_report(&report)?,
        Err(e) => {
            let (kind, message) = describe_failure(&e);
            if app.is_json() {
                println!("{}", format_error(&message, kind.code())?);
            } else {
                println!("{message}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
