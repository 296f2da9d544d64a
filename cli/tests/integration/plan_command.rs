//! Integration tests for `buildhost plan`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::{CONFIG, buildhost_with, config_dir};

#[test]
fn test_plan_lists_commands_in_order() {
    let (_dir, path) = config_dir(CONFIG);

    buildhost_with(&path)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("14 remote commands"))
        .stdout(predicate::str::contains(
            "1. sudo -S -p '[sudo] password: ' apt upgrade",
        ))
        .stdout(predicate::str::contains("setup_16.x"))
        .stdout(predicate::str::contains(
            "14. cd /srv/app && git push  [pty]",
        ));
}

#[test]
fn test_plan_json_is_an_array_of_commands() {
    let (_dir, path) = config_dir(CONFIG);

    let output = buildhost_with(&path)
        .args(["plan", "--json"])
        .output()
        .expect("spawn");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let steps = value.as_array().expect("array");
    assert_eq!(steps.len(), 14);
    assert_eq!(
        steps[1]["command"],
        "sudo -S -p '[sudo] password: ' apt install -y curl build-essential"
    );
    assert_eq!(steps[1]["privileged"], true);
    assert_eq!(steps[5]["interactive"], true);
    assert_eq!(steps[12]["command"], "cd /srv/app && git commit -m 'compiled project'");
}

#[test]
fn test_plan_never_prompts_for_passwords() {
    let (_dir, path) = config_dir(CONFIG);

    buildhost_with(&path)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter the").not());
}
