//! Shared helpers for spawning the binary against a temp config.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const CONFIG: &str = r#"
[server_credencials]
host = "127.0.0.1"
username = "deploy"
port = 22

[packages]
apt_packages = ["curl", "build-essential"]
nodejs_version = "16.x"

[project]
name = "app"
path_to_download = "/srv"

[git.gitlab]
repo_uri = "https://gitlab.com/acme/app.git"
username = "deploy-bot"
"#;

/// A temp dir holding `fab.conf` with `content`.
pub fn config_dir(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("fab.conf");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

/// The binary with a clean environment: no config override, no colour.
pub fn buildhost() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("buildhost"));
    cmd.env_remove("BUILDHOST_CONFIG")
        .env_remove("BUILDHOST_HOST_PASSWORD")
        .env_remove("BUILDHOST_REPO_PASSWORD")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// The binary pointed at `config` through `--config`.
pub fn buildhost_with(config: &Path) -> Command {
    let mut cmd = buildhost();
    cmd.arg("--config").arg(config);
    cmd
}
