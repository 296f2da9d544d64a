//! Builders for every command the run issues, in the exact form the remote
//! host expects.

use crate::domain::command::RemoteCommand;
use crate::domain::prompt::Responder;

/// Commit message used when publishing the build output.
pub const COMMIT_MESSAGE: &str = "compiled project";

/// Base URL of the vendor runtime-setup scripts.
pub const NODESOURCE_SETUP_URL: &str = "https://deb.nodesource.com/setup_";

// ── Provisioning ─────────────────────────────────────────────────────────────

#[must_use]
pub fn apt_upgrade() -> RemoteCommand {
    RemoteCommand::new("apt upgrade").privileged()
}

/// `apt install -y` for the space-joined package list.
#[must_use]
pub fn apt_install(packages: &[String]) -> RemoteCommand {
    RemoteCommand::new(format!("apt install -y {}", packages.join(" "))).privileged()
}

/// Pipe the runtime-setup script for `version` (e.g. `16.x`) into a root shell.
#[must_use]
pub fn nodesource_setup(version: &str) -> RemoteCommand {
    RemoteCommand::new(format!(
        "curl -sL {NODESOURCE_SETUP_URL}{version} | sudo -E bash -"
    ))
    .privileged()
}

#[must_use]
pub fn install_nodejs() -> RemoteCommand {
    RemoteCommand::new("apt install -y nodejs").privileged()
}

// ── Fetch and build ──────────────────────────────────────────────────────────

#[must_use]
pub fn make_dir(path: &str) -> RemoteCommand {
    RemoteCommand::new(format!("mkdir -p {path}"))
}

#[must_use]
pub fn git_clone(parent: &str, repo_uri: &str, responders: Vec<Responder>) -> RemoteCommand {
    RemoteCommand::new(format!("git clone {repo_uri}"))
        .in_dir(parent)
        .interactive(responders)
}

#[must_use]
pub fn npm_install(project_path: &str) -> RemoteCommand {
    RemoteCommand::new("npm install --save-exact").in_dir(project_path)
}

#[must_use]
pub fn npm_build(project_path: &str) -> RemoteCommand {
    RemoteCommand::new("npm run build").in_dir(project_path)
}

/// Where the clone of `project_name` lands under `parent`.
///
/// ```
/// use buildhost_cli::domain::steps::project_path;
///
/// assert_eq!(project_path("/srv", "app"), "/srv/app");
/// assert_eq!(project_path("/srv/", "app"), "/srv/app");
/// assert_eq!(project_path("$HOME", "app"), "$HOME/app");
/// ```
#[must_use]
pub fn project_path(parent: &str, project_name: &str) -> String {
    let trimmed = parent.trim_end_matches('/');
    if trimmed.is_empty() && parent.starts_with('/') {
        return format!("/{project_name}");
    }
    format!("{trimmed}/{project_name}")
}

// ── Git identity ─────────────────────────────────────────────────────────────

#[must_use]
pub fn git_safe_directory(project_path: &str) -> RemoteCommand {
    RemoteCommand::new(format!(
        "git config --global --add safe.directory {project_path}"
    ))
    .in_dir(project_path)
}

#[must_use]
pub fn git_user_name(project_path: &str, name: &str) -> RemoteCommand {
    RemoteCommand::new(format!("git config user.name '{name}'")).in_dir(project_path)
}

#[must_use]
pub fn git_user_email(project_path: &str, email: &str) -> RemoteCommand {
    RemoteCommand::new(format!("git config user.email '{email}'")).in_dir(project_path)
}

// ── Publish ──────────────────────────────────────────────────────────────────

#[must_use]
pub fn git_add_build(project_path: &str) -> RemoteCommand {
    RemoteCommand::new("git add -f build/*").in_dir(project_path)
}

#[must_use]
pub fn git_commit(project_path: &str) -> RemoteCommand {
    RemoteCommand::new(format!("git commit -m '{COMMIT_MESSAGE}'")).in_dir(project_path)
}

#[must_use]
pub fn git_push(project_path: &str, responders: Vec<Responder>) -> RemoteCommand {
    RemoteCommand::new("git push")
        .in_dir(project_path)
        .interactive(responders)
}
