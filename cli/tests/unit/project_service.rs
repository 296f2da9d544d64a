//! Unit tests for cloning and building the project.

#![allow(clippy::expect_used)]

use buildhost_cli::application::services::project::setup_project;
use buildhost_cli::domain::{ProjectConfig, RemoteError, Secret};

use crate::helpers::{FakeConnector, RecordingReporter, config, err_output, remote_error};

fn project(parent: &str) -> ProjectConfig {
    ProjectConfig {
        name: "app".to_string(),
        path_to_download: parent.to_string(),
    }
}

#[test]
fn test_setup_project_clones_installs_and_builds() {
    let connector = FakeConnector::new();
    let shell = connector.session();

    let path = setup_project(
        &shell,
        &config().git.remote,
        &Secret::new("pw"),
        &project("/srv"),
        &RecordingReporter::default(),
    )
    .expect("setup succeeds");

    assert_eq!(path, "/srv/app");
    assert_eq!(
        connector.lines(),
        vec![
            "mkdir -p /srv",
            "git clone https://gitlab.com/acme/app.git",
            "npm install --save-exact",
            "npm run build",
        ]
    );
}

#[test]
fn test_setup_project_trailing_slash_in_parent() {
    let connector = FakeConnector::new();
    let shell = connector.session();

    let path = setup_project(
        &shell,
        &config().git.remote,
        &Secret::new("pw"),
        &project("/srv/"),
        &RecordingReporter::default(),
    )
    .expect("setup succeeds");

    assert_eq!(path, "/srv/app");
}

#[test]
fn test_setup_project_answers_custom_prompt_patterns() {
    let mut remote = config().git.remote;
    remote.prompts.username = "Login: ".to_string();
    remote.prompts.password = "Token: ".to_string();
    let connector = FakeConnector::new().prompting("Login: ");
    let shell = connector.session();

    setup_project(
        &shell,
        &remote,
        &Secret::new("pw"),
        &project("/srv"),
        &RecordingReporter::default(),
    )
    .expect("setup succeeds");

    let clone = &connector.recorded()[1];
    assert_eq!(clone.answers, vec!["deploy-bot\n"]);
}

#[test]
fn test_setup_project_invalid_prompt_pattern_runs_no_clone() {
    let mut remote = config().git.remote;
    remote.prompts.password = "(unclosed".to_string();
    let connector = FakeConnector::new();
    let shell = connector.session();

    setup_project(
        &shell,
        &remote,
        &Secret::new("pw"),
        &project("/srv"),
        &RecordingReporter::default(),
    )
    .expect_err("pattern rejected");

    assert_eq!(connector.lines(), vec!["mkdir -p /srv"]);
}

#[test]
fn test_setup_project_failed_install_skips_build() {
    let connector = FakeConnector::new()
        .fail_on("npm install --save-exact", err_output(1, "npm ERR! code E404"));
    let shell = connector.session();

    let err = setup_project(
        &shell,
        &config().git.remote,
        &Secret::new("pw"),
        &project("/srv"),
        &RecordingReporter::default(),
    )
    .expect_err("install fails");

    assert!(!connector.lines().contains(&"npm run build".to_string()));
    match remote_error(&err) {
        Some(RemoteError::CommandFailed { command, detail, .. }) => {
            assert_eq!(command, "npm install --save-exact");
            assert_eq!(detail, ": npm ERR! code E404");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
