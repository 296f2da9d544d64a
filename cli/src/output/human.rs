//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::pipeline::RunReport;
use crate::domain::PlannedCommand;
use crate::domain::config::ProvisionConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("buildhost {version}");
    }

    /// Render the ordered command list of a dry run.
    pub fn render_plan(&self, plan: &[PlannedCommand]) {
        self.ctx.header(&format!("{} remote commands, in order:", plan.len()));
        println!();
        for (i, step) in plan.iter().enumerate() {
            let mut flags = Vec::new();
            if step.privileged {
                flags.push("sudo");
            }
            if step.interactive {
                flags.push("pty");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", flags.join(", "))
            };
            println!(
                "  {:>2}. {}{}",
                i + 1,
                step.command,
                flags.style(self.ctx.styles.dim)
            );
        }
    }

    /// Render the validated configuration. Passwords are never part of it.
    pub fn render_config(&self, config: &ProvisionConfig, path: &Path) {
        let host = &config.server_credentials;
        let packages = if config.packages.apt_packages.is_empty() {
            "(none)".to_string()
        } else {
            config.packages.apt_packages.join(" ")
        };
        let known_hosts = config
            .ssh
            .known_hosts
            .as_deref()
            .map_or_else(|| "~/.ssh/known_hosts".to_string(), |p| p.display().to_string());

        self.ctx
            .header(&format!("Configuration ({})", path.display()));
        for (key, value) in [
            ("host:", format!("{}@{}:{}", host.username, host.host, host.port)),
            ("apt packages:", packages),
            ("nodejs:", config.packages.nodejs_version.clone()),
            ("repository:", config.git.remote.repo_uri.clone()),
            ("repository user:", config.git.remote.username.clone()),
            (
                "project:",
                format!(
                    "{}/{}",
                    config.project.path_to_download.trim_end_matches('/'),
                    config.project.name
                ),
            ),
            (
                "commit author:",
                format!(
                    "{} <{}>",
                    config.git.identity.config_name, config.git.identity.config_email
                ),
            ),
        ] {
            self.ctx.kv(&format!("{key:<20}"), &value);
        }

        self.ctx.header("SSH");
        for (key, value) in [
            ("connect timeout:", format!("{}s", config.ssh.connect_timeout_secs)),
            ("known_hosts:", known_hosts),
            (
                "strict checking:",
                (if config.ssh.strict_host_key_checking { "on" } else { "off" }).to_string(),
            ),
        ] {
            self.ctx.kv(&format!("{key:<20}"), &value);
        }
    }

    /// Render the outcome of a completed run.
    pub fn render_report(&self, report: &RunReport) {
        self.ctx
            .success(&format!("Run complete: {}", report.stage));
        self.ctx.kv("Project", &report.project_path);
    }
}
