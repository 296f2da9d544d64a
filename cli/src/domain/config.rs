//! Domain types and validators for the run configuration.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::prompt::{GIT_PASSWORD_PATTERN, GIT_USERNAME_PATTERN};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, read once from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Target host. The legacy misspelling `server_credencials` is accepted.
    #[serde(alias = "server_credencials")]
    pub server_credentials: HostConfig,
    #[serde(default)]
    pub packages: PackageConfig,
    pub project: ProjectConfig,
    pub git: GitConfig,
    #[serde(default)]
    pub ssh: SshConfig,
}

/// Where and as whom to connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub host: String,
    pub username: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// OS packages and the JavaScript runtime line to install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub apt_packages: Vec<String>,
    /// NodeSource release line, e.g. `16.x`.
    #[serde(default = "default_nodejs_version")]
    pub nodejs_version: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            apt_packages: Vec::new(),
            nodejs_version: default_nodejs_version(),
        }
    }
}

/// The project to clone and build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory name the clone creates.
    pub name: String,
    /// Parent directory on the remote host; expanded by the remote shell.
    #[serde(default = "default_download_path")]
    pub path_to_download: String,
}

/// Git remote and commit identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(rename = "gitlab")]
    pub remote: GitRemoteConfig,
    #[serde(rename = "git", default)]
    pub identity: GitIdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemoteConfig {
    pub repo_uri: String,
    pub username: String,
    /// Patterns recognising the remote's credential prompts.
    #[serde(default)]
    pub prompts: PromptConfig,
}

/// Credential prompt patterns. Override these for git hosts that word their
/// prompts differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_username_pattern")]
    pub username: String,
    #[serde(default = "default_password_pattern")]
    pub password: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            username: default_username_pattern(),
            password: default_password_pattern(),
        }
    }
}

/// Repository-local commit author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitIdentityConfig {
    #[serde(default = "default_author_name")]
    pub config_name: String,
    #[serde(default)]
    pub config_email: String,
}

impl Default for GitIdentityConfig {
    fn default() -> Self {
        Self {
            config_name: default_author_name(),
            config_email: String::new(),
        }
    }
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshConfig {
    /// TCP connect timeout. Remote commands themselves never time out.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// `known_hosts` file to check the server key against. Defaults to
    /// `~/.ssh/known_hosts`.
    #[serde(default)]
    pub known_hosts: Option<PathBuf>,
    /// Refuse hosts that have no `known_hosts` entry.
    #[serde(default)]
    pub strict_host_key_checking: bool,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            known_hosts: None,
            strict_host_key_checking: false,
        }
    }
}

fn default_port() -> u16 {
    22
}

fn default_nodejs_version() -> String {
    "14.x".to_string()
}

fn default_download_path() -> String {
    "$HOME".to_string()
}

fn default_author_name() -> String {
    "Fabric".to_string()
}

fn default_username_pattern() -> String {
    GIT_USERNAME_PATTERN.to_string()
}

fn default_password_pattern() -> String {
    GIT_PASSWORD_PATTERN.to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Characters that would let a value escape the command line it is spliced into.
const SHELL_CONTROL: &[char] = &[';', '&', '|', '`', '\n', '\r', '<', '>', '(', ')'];

/// Validates the whole configuration before anything touches the network.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found.
pub fn validate(config: &ProvisionConfig) -> Result<(), ConfigError> {
    let host = &config.server_credentials;
    require("server_credentials.host", &host.host)?;
    if host.host.chars().any(char::is_whitespace) {
        return Err(invalid("server_credentials.host", &host.host, "must not contain whitespace"));
    }
    require("server_credentials.username", &host.username)?;
    if host.port == 0 {
        return Err(invalid("server_credentials.port", "0", "must be between 1 and 65535"));
    }

    for package in &config.packages.apt_packages {
        if !is_package_name(package) {
            return Err(invalid(
                "packages.apt_packages",
                package,
                "must be a plain package name (letters, digits, + . : = ~ _ -)",
            ));
        }
    }
    let version = &config.packages.nodejs_version;
    if !is_version_line(version) {
        return Err(invalid(
            "packages.nodejs_version",
            version,
            "must look like 16.x or lts.x",
        ));
    }

    let project = &config.project;
    require("project.name", &project.name)?;
    if project.name.contains('/')
        || project.name.contains(SHELL_CONTROL)
        || project.name.contains(char::is_whitespace)
    {
        return Err(invalid("project.name", &project.name, "must be a single directory name"));
    }
    require("project.path_to_download", &project.path_to_download)?;
    if project.path_to_download.contains(SHELL_CONTROL)
        || project.path_to_download.contains(char::is_whitespace)
    {
        return Err(invalid(
            "project.path_to_download",
            &project.path_to_download,
            "must not contain whitespace or shell control characters",
        ));
    }

    let remote = &config.git.remote;
    require("git.gitlab.repo_uri", &remote.repo_uri)?;
    if remote.repo_uri.contains(SHELL_CONTROL) || remote.repo_uri.contains(char::is_whitespace) {
        return Err(invalid("git.gitlab.repo_uri", &remote.repo_uri, "must be a single URI"));
    }
    require("git.gitlab.username", &remote.username)?;
    compile("git.gitlab.prompts.username", &remote.prompts.username)?;
    compile("git.gitlab.prompts.password", &remote.prompts.password)?;

    let identity = &config.git.identity;
    for (key, value) in [
        ("git.git.config_name", &identity.config_name),
        ("git.git.config_email", &identity.config_email),
    ] {
        if value.contains('\'') || value.contains(['\n', '\r']) {
            return Err(invalid(key, value, "must not contain quotes or newlines"));
        }
    }

    if config.ssh.connect_timeout_secs == 0 {
        return Err(invalid("ssh.connect_timeout_secs", "0", "must be at least 1"));
    }
    Ok(())
}

fn require(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing {
            key: key.to_string(),
        });
    }
    Ok(())
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn compile(key: &str, pattern: &str) -> Result<(), ConfigError> {
    regex::Regex::new(pattern)
        .map(drop)
        .map_err(|source| ConfigError::InvalidPattern {
            key: key.to_string(),
            source,
        })
}

fn is_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || "+.:=~_-".contains(c))
}

fn is_version_line(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

// ── Unit tests ───────────────────────────────────────────────────────────────
