//! Unit tests for the package provisioner.

#![allow(clippy::expect_used)]

use buildhost_cli::application::services::provision::{install_nodejs, install_packages};
use buildhost_cli::domain::PackageConfig;

use crate::helpers::{FakeConnector, RecordingReporter, err_output};

fn packages(names: &[&str], version: &str) -> PackageConfig {
    PackageConfig {
        apt_packages: names.iter().map(ToString::to_string).collect(),
        nodejs_version: version.to_string(),
    }
}

#[test]
fn test_install_packages_upgrades_then_installs_list() {
    let connector = FakeConnector::new();
    let shell = connector.session();

    install_packages(
        &shell,
        &packages(&["curl", "build-essential"], "16.x"),
        &RecordingReporter::default(),
    )
    .expect("install succeeds");

    assert_eq!(
        connector.lines(),
        vec!["apt upgrade", "apt install -y curl build-essential"]
    );
    assert!(connector.recorded().iter().all(|r| r.privileged));
}

#[test]
fn test_install_packages_renders_sudo_with_fixed_prompt() {
    let connector = FakeConnector::new();
    let shell = connector.session();

    install_packages(&shell, &packages(&["git"], "16.x"), &RecordingReporter::default())
        .expect("install succeeds");

    assert_eq!(
        connector.recorded()[1].rendered,
        "sudo -S -p '[sudo] password: ' apt install -y git"
    );
}

#[test]
fn test_install_packages_failed_upgrade_skips_install() {
    let connector =
        FakeConnector::new().fail_on("apt upgrade", err_output(100, "E: Could not get lock"));
    let shell = connector.session();

    let err = install_packages(
        &shell,
        &packages(&["curl"], "16.x"),
        &RecordingReporter::default(),
    )
    .expect_err("upgrade fails");

    assert_eq!(connector.lines(), vec!["apt upgrade"]);
    assert!(format!("{err:#}").contains("Could not get lock"));
}

#[test]
fn test_install_nodejs_sets_up_repository_then_installs() {
    let connector = FakeConnector::new();
    let shell = connector.session();
    let reporter = RecordingReporter::default();

    install_nodejs(&shell, "14.x", &reporter).expect("install succeeds");

    assert_eq!(
        connector.lines(),
        vec![
            "curl -sL https://deb.nodesource.com/setup_14.x | sudo -E bash -",
            "apt install -y nodejs",
        ]
    );
    assert!(
        reporter
            .messages
            .borrow()
            .iter()
            .any(|m| m == "ok: nodejs 14.x installed")
    );
}
