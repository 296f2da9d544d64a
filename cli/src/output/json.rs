//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one JSON document on stdout.
//! Failures use the error object produced by [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::pipeline::RunReport;
use crate::domain::PlannedCommand;
use crate::domain::config::ProvisionConfig;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

#[derive(Serialize)]
struct ConfigDocument<'a> {
    path: &'a Path,
    config: &'a ProvisionConfig,
}

impl JsonRenderer {
    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }

    /// Render the planned command sequence as an array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_plan(&self, plan: &[PlannedCommand]) -> Result<()> {
        print_json(&plan)
    }

    /// Render the validated configuration together with its path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &ProvisionConfig, path: &Path) -> Result<()> {
        print_json(&ConfigDocument { path, config })
    }

    /// Render the outcome of a completed run.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_report(&self, report: &RunReport) -> Result<()> {
        print_json(report)
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}
