//! Git configurator — trust the project directory and set the commit author.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::application::services::run_checked;
use crate::domain::config::GitIdentityConfig;
use crate::domain::steps;

/// Mark `project_path` as a safe directory (global scope) and set the
/// repository-local author name and email.
///
/// # Errors
///
/// Returns an error if any `git config` call exits non-zero.
pub fn configure_git(
    shell: &impl RemoteShell,
    project_path: &str,
    identity: &GitIdentityConfig,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("configuring git identity...");
    run_checked(shell, &steps::git_safe_directory(project_path))
        .context("marking project as a safe git directory")?;
    run_checked(shell, &steps::git_user_name(project_path, &identity.config_name))
        .context("setting git user.name")?;
    run_checked(shell, &steps::git_user_email(project_path, &identity.config_email))
        .context("setting git user.email")?;
    Ok(())
}
