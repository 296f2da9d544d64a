//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Provision a remote host, build a frontend project on it, and push the build
#[derive(Parser)]
#[command(
    name = "buildhost",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any of `1`, `true`, `yes`, `on` in `NO_COLOR`)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub no_color: bool,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file [default: $BUILDHOST_CONFIG, then ./fab.conf]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the host, build the project and push the build output
    Run,

    /// Print the remote commands a run would issue, without connecting
    Plan,

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before the run's own error
    /// handler takes over (bad config, unreadable password prompt).
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });
        match command {
            Command::Run => commands::run::run(&app),
            Command::Plan => commands::plan::run(&app),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
