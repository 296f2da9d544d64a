//! Project fetcher/builder — clone the repository, install dependencies, build.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::application::services::run_checked;
use crate::domain::config::{GitRemoteConfig, ProjectConfig};
use crate::domain::prompt::git_credential_responders;
use crate::domain::{Secret, steps};

/// Clone `remote` under `project.path_to_download` and build it.
///
/// Returns the project directory on the remote host. A failed clone or build
/// leaves whatever was already written in place.
///
/// # Errors
///
/// Returns an error if any command exits non-zero or a prompt pattern is invalid.
pub fn setup_project(
    shell: &impl RemoteShell,
    remote: &GitRemoteConfig,
    password: &Secret,
    project: &ProjectConfig,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let parent = project.path_to_download.as_str();
    run_checked(shell, &steps::make_dir(parent))
        .with_context(|| format!("creating {parent}"))?;

    reporter.step(&format!("cloning {}...", remote.repo_uri));
    let responders = git_credential_responders(
        &remote.prompts.username,
        &remote.prompts.password,
        &remote.username,
        password,
    )?;
    run_checked(shell, &steps::git_clone(parent, &remote.repo_uri, responders))
        .with_context(|| format!("cloning {}", remote.repo_uri))?;

    let project_path = steps::project_path(parent, &project.name);

    reporter.step("installing npm dependencies...");
    run_checked(shell, &steps::npm_install(&project_path)).context("installing npm dependencies")?;

    reporter.step("building project...");
    run_checked(shell, &steps::npm_build(&project_path)).context("building project")?;
    reporter.success(&format!("built {project_path}"));

    Ok(project_path)
}
