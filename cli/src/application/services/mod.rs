//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod config_service;
pub mod git_config;
pub mod pipeline;
pub mod project;
pub mod provision;
pub mod publish;

use anyhow::Result;

use crate::application::ports::{CommandOutput, RemoteShell};
use crate::domain::{AuthTarget, RemoteCommand, RemoteError};

/// Output fragments git hosts print when they reject credentials.
const GIT_AUTH_FAILURES: &[&str] = &[
    "Authentication failed",
    "Invalid username or password",
    "HTTP Basic: Access denied",
];

/// Output fragments sudo prints after a wrong password.
const SUDO_AUTH_FAILURES: &[&str] = &["incorrect password attempt", "Sorry, try again"];

/// Run `command` and turn a non-zero exit into an error.
///
/// Rejected credentials (sudo or a git remote) surface as
/// `RemoteError::Authentication`; any other failure as
/// `RemoteError::CommandFailed`.
///
/// # Errors
///
/// Returns an error if the transport fails or the command exits non-zero.
pub fn run_checked(shell: &impl RemoteShell, command: &RemoteCommand) -> Result<CommandOutput> {
    tracing::debug!(command = %command.render(), pty = command.uses_pty(), "running remote command");
    let output = shell.run(command)?;
    tracing::debug!(status = output.status, "remote command exited");
    if output.success() {
        return Ok(output);
    }
    if let Some(target) = auth_failure(command, &output) {
        return Err(RemoteError::Authentication { target }.into());
    }
    let text = if output.stderr.trim().is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    Err(RemoteError::command_failed(command.line(), output.status, text).into())
}

fn auth_failure(command: &RemoteCommand, output: &CommandOutput) -> Option<AuthTarget> {
    let mentions = |needles: &[&str]| {
        needles
            .iter()
            .any(|n| output.stdout.contains(n) || output.stderr.contains(n))
    };
    if command.is_privileged() && mentions(SUDO_AUTH_FAILURES) {
        return Some(AuthTarget::Host);
    }
    if !command.responders().is_empty() && mentions(GIT_AUTH_FAILURES) {
        return Some(AuthTarget::GitRemote);
    }
    None
}
