//! Unit tests for the full run pipeline.
//!
//! Each test wires a `FakeConnector` into `pipeline::run` and checks which
//! commands reached the host, in what order, and how failures surface.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use buildhost_cli::application::services::pipeline::{self, RunSettings, Stage};
use buildhost_cli::domain::{AuthTarget, RemoteError, Secret};

use crate::helpers::{
    EXPECTED_LINES, FakeConnector, RecordingReporter, err_output, remote_error, settings,
};

// ── Happy path ───────────────────────────────────────────────────────────────

#[test]
fn test_run_issues_every_command_once_in_order() {
    let connector = FakeConnector::new();

    let report = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect("run succeeds");

    assert_eq!(connector.lines(), EXPECTED_LINES);
    assert_eq!(report.stage, Stage::Published);
    assert_eq!(report.project_path, "/srv/app");
    assert_eq!(connector.connects(), 1);
}

#[test]
fn test_run_closes_session_after_success() {
    let connector = FakeConnector::new();

    pipeline::run(&connector, &settings(), &RecordingReporter::default()).expect("run succeeds");

    assert_eq!(connector.drops(), 1);
}

#[test]
fn test_run_elevates_only_provisioning_commands() {
    let connector = FakeConnector::new();

    pipeline::run(&connector, &settings(), &RecordingReporter::default()).expect("run succeeds");

    let privileged: Vec<String> = connector
        .recorded()
        .into_iter()
        .filter(|r| r.privileged)
        .map(|r| r.line)
        .collect();
    assert_eq!(privileged, &EXPECTED_LINES[..4]);
}

#[test]
fn test_run_uses_pty_only_for_clone_and_push() {
    let connector = FakeConnector::new();

    pipeline::run(&connector, &settings(), &RecordingReporter::default()).expect("run succeeds");

    let interactive: Vec<String> = connector
        .recorded()
        .into_iter()
        .filter(|r| r.pty)
        .map(|r| r.line)
        .collect();
    assert_eq!(
        interactive,
        vec!["git clone https://gitlab.com/acme/app.git", "git push"]
    );
}

#[test]
fn test_run_answers_git_prompts_with_configured_credentials() {
    let connector = FakeConnector::new().prompting(
        "Username for 'https://gitlab.com': Password for 'https://deploy-bot@gitlab.com': ",
    );

    pipeline::run(&connector, &settings(), &RecordingReporter::default()).expect("run succeeds");

    for recorded in connector.recorded().into_iter().filter(|r| r.pty) {
        assert!(
            recorded.answers.contains(&"deploy-bot\n".to_string()),
            "{}: {:?}",
            recorded.line,
            recorded.answers
        );
        assert!(
            recorded.answers.contains(&"repo-pw\n".to_string()),
            "{}: {:?}",
            recorded.line,
            recorded.answers
        );
    }
}

#[test]
fn test_run_renders_project_commands_inside_project_dir() {
    let connector = FakeConnector::new();

    pipeline::run(&connector, &settings(), &RecordingReporter::default()).expect("run succeeds");

    let rendered: Vec<String> = connector
        .recorded()
        .into_iter()
        .map(|r| r.rendered)
        .collect();
    assert_eq!(rendered[6], "cd /srv/app && npm install --save-exact");
    assert_eq!(rendered[7], "cd /srv/app && npm run build");
    assert_eq!(rendered[13], "cd /srv/app && git push");
    assert_eq!(
        rendered[5],
        "cd /srv && git clone https://gitlab.com/acme/app.git"
    );
}

#[test]
fn test_run_reports_progress_for_each_stage() {
    let connector = FakeConnector::new();
    let reporter = RecordingReporter::default();

    pipeline::run(&connector, &settings(), &reporter).expect("run succeeds");

    let messages = reporter.messages.borrow();
    assert!(messages[0].starts_with("step: connecting to deploy@10.0.0.5:22"));
    assert!(messages.iter().any(|m| m == "ok: built /srv/app"));
    assert_eq!(messages.last().map(String::as_str), Some("ok: build output pushed"));
}

// ── Parameterisation ─────────────────────────────────────────────────────────

#[test]
fn test_run_with_default_download_path_uses_home() {
    let mut settings = settings();
    settings.config.project.path_to_download = "$HOME".to_string();
    let connector = FakeConnector::new();

    let report = pipeline::run(&connector, &settings, &RecordingReporter::default())
        .expect("run succeeds");

    assert_eq!(report.project_path, "$HOME/app");
    assert!(connector.lines().contains(&"mkdir -p $HOME".to_string()));
}

#[test]
fn test_run_embeds_nodejs_version_in_setup_command() {
    let mut settings = settings();
    settings.config.packages.nodejs_version = "18.x".to_string();
    let connector = FakeConnector::new();

    pipeline::run(&connector, &settings, &RecordingReporter::default()).expect("run succeeds");

    assert_eq!(
        connector.lines()[2],
        "curl -sL https://deb.nodesource.com/setup_18.x | sudo -E bash -"
    );
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn test_run_wrong_host_password_issues_no_commands() {
    let connector = FakeConnector::refusing(|| RemoteError::Authentication {
        target: AuthTarget::Host,
    });

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("auth fails");

    assert!(connector.lines().is_empty());
    assert_eq!(
        err.to_string(),
        "Authentication failed. Please check your credentials."
    );
    assert_eq!(connector.drops(), 0);
}

#[test]
fn test_run_unreachable_host_issues_no_commands() {
    let connector = FakeConnector::refusing(|| RemoteError::Connection {
        host: "10.0.0.5".to_string(),
        port: 22,
        reason: "connection refused".to_string(),
    });

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("connect fails");

    assert!(connector.lines().is_empty());
    assert!(matches!(
        remote_error(&err),
        Some(RemoteError::Connection { .. })
    ));
}

#[test]
fn test_run_failed_build_stops_before_publish() {
    let connector =
        FakeConnector::new().fail_on("npm run build", err_output(1, "error: build failed"));

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("build fails");

    assert_eq!(connector.lines(), &EXPECTED_LINES[..8]);
    for never in ["git add -f build/*", "git commit -m 'compiled project'", "git push"] {
        assert!(!connector.lines().iter().any(|l| l == never), "{never} ran");
    }
    assert!(matches!(
        remote_error(&err),
        Some(RemoteError::CommandFailed { status: 1, .. })
    ));
    assert_eq!(connector.drops(), 1);
}

#[test]
fn test_run_failed_upgrade_stops_immediately() {
    let connector =
        FakeConnector::new().fail_on("apt upgrade", err_output(100, "E: dpkg was interrupted"));

    pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("upgrade fails");

    assert_eq!(connector.lines(), vec!["apt upgrade"]);
}

#[test]
fn test_run_wrong_sudo_password_is_host_authentication_failure() {
    let connector = FakeConnector::new().fail_on(
        "apt upgrade",
        err_output(1, "Sorry, try again.\nsudo: 3 incorrect password attempts"),
    );

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("sudo fails");

    assert!(matches!(
        remote_error(&err),
        Some(RemoteError::Authentication {
            target: AuthTarget::Host
        })
    ));
}

#[test]
fn test_run_rejected_clone_credentials_is_git_authentication_failure() {
    let connector = FakeConnector::new().fail_on(
        "git clone https://gitlab.com/acme/app.git",
        err_output(
            128,
            "remote: HTTP Basic: Access denied\n\
             fatal: Authentication failed for 'https://gitlab.com/acme/app.git/'",
        ),
    );

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("clone fails");

    assert!(matches!(
        remote_error(&err),
        Some(RemoteError::Authentication {
            target: AuthTarget::GitRemote
        })
    ));
    assert_eq!(
        connector.lines().last().map(String::as_str),
        Some("git clone https://gitlab.com/acme/app.git")
    );
}

#[test]
fn test_run_failed_push_keeps_local_commit() {
    let connector = FakeConnector::new().fail_on(
        "git push",
        err_output(1, "! [rejected] main -> main (fetch first)"),
    );

    let err = pipeline::run(&connector, &settings(), &RecordingReporter::default())
        .expect_err("push fails");

    assert_eq!(connector.lines(), EXPECTED_LINES);
    assert!(format!("{err:#}").contains("[rejected]"));
}

// ── Settings ─────────────────────────────────────────────────────────────────

struct ScriptedPrompter {
    asked: std::cell::RefCell<Vec<String>>,
}

impl buildhost_cli::application::ports::SecretPrompter for ScriptedPrompter {
    fn password(&self, prompt: &str) -> anyhow::Result<Secret> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(Secret::new(format!("answer-{}", self.asked.borrow().len())))
    }
}

#[test]
fn test_collect_asks_host_password_then_repo_password() {
    let prompter = ScriptedPrompter {
        asked: std::cell::RefCell::default(),
    };

    let settings = RunSettings::collect(crate::helpers::config(), &prompter).expect("collect");

    assert_eq!(
        *prompter.asked.borrow(),
        vec!["Enter the user password", "Enter the gitlab password"]
    );
    assert_eq!(settings.host_password.expose(), "answer-1");
    assert_eq!(settings.repo_password.expose(), "answer-2");
}
