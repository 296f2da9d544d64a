//! Publisher — commit the build output and push it back to the remote.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::application::services::run_checked;
use crate::domain::config::GitRemoteConfig;
use crate::domain::prompt::git_credential_responders;
use crate::domain::{Secret, steps};

/// Force-add `build/`, commit it, and push.
///
/// Nothing to commit, rejected credentials, and a rejected push all fail the
/// step; none of them is retried.
///
/// # Errors
///
/// Returns an error if any command exits non-zero or a prompt pattern is invalid.
pub fn push_build(
    shell: &impl RemoteShell,
    project_path: &str,
    remote: &GitRemoteConfig,
    password: &Secret,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("committing build output...");
    run_checked(shell, &steps::git_add_build(project_path)).context("staging build output")?;
    run_checked(shell, &steps::git_commit(project_path)).context("committing build output")?;

    reporter.step("pushing to remote...");
    let responders = git_credential_responders(
        &remote.prompts.username,
        &remote.prompts.password,
        &remote.username,
        password,
    )?;
    run_checked(shell, &steps::git_push(project_path, responders)).context("pushing build output")?;
    reporter.success("build output pushed");
    Ok(())
}
