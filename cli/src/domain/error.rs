//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Remote errors ─────────────────────────────────────────────────────────────

/// Which side rejected the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTarget {
    /// The SSH server or `sudo` on it.
    Host,
    /// The git remote during clone or push.
    GitRemote,
}

/// Failures talking to the remote host.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Authentication failed. Please check your credentials.")]
    Authentication { target: AuthTarget },

    #[error("Could not connect to the specified host.")]
    Connection { host: String, port: u16, reason: String },

    #[error("Host key for {host} does not match the known_hosts entry.")]
    HostKeyMismatch { host: String },

    #[error("Host {host} is not in known_hosts and strict host key checking is on.")]
    HostKeyUnknown { host: String },

    #[error("Command '{command}' exited with status {status}{detail}")]
    CommandFailed {
        command: String,
        status: i32,
        detail: String,
    },

    #[error("SSH session error: {0}")]
    Session(String),
}

impl RemoteError {
    /// Build a `CommandFailed`, attaching the last non-empty output line when there is one.
    #[must_use]
    pub fn command_failed(command: &str, status: i32, output: &str) -> Self {
        let detail = output
            .lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .map(|l| format!(": {l}"))
            .unwrap_or_default();
        Self::CommandFailed {
            command: command.to_string(),
            status,
            detail,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors found while validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {key}")]
    Missing { key: String },

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid prompt pattern for {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}
