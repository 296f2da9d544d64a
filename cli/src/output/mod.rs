//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::pipeline::RunReport;
use crate::domain::PlannedCommand;
use crate::domain::config::ProvisionConfig;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Renders command results in the mode chosen on the command line.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the CLI version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_version(version);
                Ok(())
            }
            Self::Json(j) => j.render_version(version),
        }
    }

    /// Render a dry-run command list.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_plan(&self, plan: &[PlannedCommand]) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_plan(plan);
                Ok(())
            }
            Self::Json(j) => j.render_plan(plan),
        }
    }

    /// Render the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &ProvisionConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_config(config, path);
                Ok(())
            }
            Self::Json(j) => j.render_config(config, path),
        }
    }

    /// Render a completed run.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_report(&self, report: &RunReport) -> Result<()> {
        match self {
            Self::Human(h) => {
                h.render_report(report);
                Ok(())
            }
            Self::Json(j) => j.render_report(report),
        }
    }
}
