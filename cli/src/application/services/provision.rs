//! Provisioner — OS packages and the JavaScript runtime.
//!
//! Every command here runs through `sudo`. Nothing checks whether a package
//! is already present; a repeat run upgrades and installs again.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::application::services::run_checked;
use crate::domain::config::PackageConfig;
use crate::domain::steps;

/// Upgrade the host and install the configured package list.
///
/// # Errors
///
/// Returns an error if either command exits non-zero.
pub fn install_packages(
    shell: &impl RemoteShell,
    packages: &PackageConfig,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step("upgrading system packages...");
    run_checked(shell, &steps::apt_upgrade()).context("upgrading system packages")?;

    reporter.step(&format!(
        "installing packages: {}...",
        packages.apt_packages.join(" ")
    ));
    run_checked(shell, &steps::apt_install(&packages.apt_packages))
        .context("installing system packages")?;
    Ok(())
}

/// Register the NodeSource repository for `version` and install Node.js.
///
/// # Errors
///
/// Returns an error if either command exits non-zero.
pub fn install_nodejs(
    shell: &impl RemoteShell,
    version: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("adding NodeSource {version} repository..."));
    run_checked(shell, &steps::nodesource_setup(version))
        .with_context(|| format!("setting up NodeSource {version}"))?;

    reporter.step("installing nodejs...");
    run_checked(shell, &steps::install_nodejs()).context("installing nodejs")?;
    reporter.success(&format!("nodejs {version} installed"));
    Ok(())
}
