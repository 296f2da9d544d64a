//! Infrastructure implementation of the `SecretPrompter` port.
//!
//! Passwords are read from the terminal without echo. For unattended runs a
//! prompt can be answered from an environment variable instead.

use anyhow::{Context, Result};

use crate::application::ports::SecretPrompter;
use crate::domain::Secret;
use crate::domain::secret::{HOST_PASSWORD_PROMPT, REPO_PASSWORD_PROMPT};

/// Answers the host password prompt when set.
pub const HOST_PASSWORD_ENV: &str = "BUILDHOST_HOST_PASSWORD";

/// Answers the repository password prompt when set.
pub const REPO_PASSWORD_ENV: &str = "BUILDHOST_REPO_PASSWORD";

/// Terminal prompter with per-prompt environment overrides.
pub struct TerminalPrompter {
    overrides: Vec<(&'static str, &'static str)>,
}

impl TerminalPrompter {
    /// Prompter honouring `BUILDHOST_HOST_PASSWORD` and `BUILDHOST_REPO_PASSWORD`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: vec![
                (HOST_PASSWORD_PROMPT, HOST_PASSWORD_ENV),
                (REPO_PASSWORD_PROMPT, REPO_PASSWORD_ENV),
            ],
        }
    }

    fn from_env(&self, prompt: &str) -> Option<Secret> {
        let (_, var) = self.overrides.iter().find(|(p, _)| *p == prompt)?;
        let value = std::env::var(var).ok()?;
        tracing::debug!(var = %var, "password taken from environment");
        Some(Secret::new(value))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretPrompter for TerminalPrompter {
    fn password(&self, prompt: &str) -> Result<Secret> {
        if let Some(secret) = self.from_env(prompt) {
            return Ok(secret);
        }
        let value = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .with_context(|| format!("reading '{prompt}' (no terminal?)"))?;
        Ok(Secret::new(value))
    }
}
