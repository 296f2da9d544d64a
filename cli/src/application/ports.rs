//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;

use anyhow::Result;

use crate::domain::{HostConfig, ProvisionConfig, RemoteCommand, Secret};

// ── Value Types ───────────────────────────────────────────────────────────────

/// What a remote command left behind once it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status reported by the remote shell.
    pub status: i32,
    /// Everything written to stdout (stdout and stderr combined under a pty).
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

// ── Remote Session Ports ──────────────────────────────────────────────────────

/// Command execution inside an open session.
pub trait RemoteShell {
    /// Run `command` to completion, answering its prompts, and return its output.
    ///
    /// A non-zero exit status is *not* an error at this level; callers decide.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails while the command runs.
    fn run(&self, command: &RemoteCommand) -> Result<CommandOutput>;
}

/// Opens authenticated sessions.
///
/// The returned session owns the connection and closes it when dropped, so
/// every exit path of the caller releases it.
pub trait SessionConnector {
    type Session: RemoteShell;

    /// Connect to `host` and authenticate with `password`, which also becomes
    /// the session's sudo password.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Connection` if the host cannot be reached and
    /// `RemoteError::Authentication` if the credentials are rejected.
    fn connect(&self, host: &HostConfig, password: &Secret) -> Result<Self::Session>;
}

// ── Configuration and Secret Ports ────────────────────────────────────────────

/// Abstracts loading the run configuration.
pub trait ConfigStore {
    /// Load and parse the configuration file.
    fn load(&self) -> Result<ProvisionConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> &Path;
}

/// Abstracts reading a password without echo.
pub trait SecretPrompter {
    /// Ask for a secret labelled `prompt`.
    fn password(&self, prompt: &str) -> Result<Secret>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
}
