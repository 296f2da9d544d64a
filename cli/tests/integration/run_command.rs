//! Integration tests for `buildhost run` against hosts that cannot be reached.

#![allow(clippy::expect_used)]

use std::net::TcpListener;

use predicates::prelude::*;

use crate::support::{CONFIG, buildhost_with, config_dir};

/// A loopback port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

fn unreachable_config() -> String {
    CONFIG.replace("port = 22", &format!("port = {}", closed_port()))
}

#[test]
fn test_run_unreachable_host_prints_message_and_exits_zero() {
    let (_dir, path) = config_dir(&unreachable_config());

    buildhost_with(&path)
        .arg("run")
        .env("BUILDHOST_HOST_PASSWORD", "pw")
        .env("BUILDHOST_REPO_PASSWORD", "pw")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not connect to the specified host.",
        ))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_verbose_logs_abort_without_escape_codes() {
    let (_dir, path) = config_dir(&unreachable_config());

    buildhost_with(&path)
        .args(["run", "-v"])
        .env_remove("NO_COLOR")
        .env("BUILDHOST_HOST_PASSWORD", "pw")
        .env("BUILDHOST_REPO_PASSWORD", "pw")
        .assert()
        .success()
        .stderr(predicate::str::contains("run aborted"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_run_unreachable_host_json_error_object() {
    let (_dir, path) = config_dir(&unreachable_config());

    let output = buildhost_with(&path)
        .args(["run", "--json"])
        .env("BUILDHOST_HOST_PASSWORD", "pw")
        .env("BUILDHOST_REPO_PASSWORD", "pw")
        .output()
        .expect("spawn");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "connection");
    assert_eq!(value["message"], "Could not connect to the specified host.");
}

#[test]
fn test_run_with_invalid_config_fails_before_prompting() {
    let (_dir, path) = config_dir(&CONFIG.replace("name = \"app\"", "name = \"a/b\""));

    buildhost_with(&path)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("project.name"))
        .stdout(predicate::str::contains("Enter the").not());
}
