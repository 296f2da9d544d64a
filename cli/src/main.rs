//! buildhost - provision a remote host, build a frontend project, push the build

use std::process::ExitCode;

use buildhost_cli::cli::Cli;
use clap::Parser;
use console::Term;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from the default `warn`.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "buildhost_cli=debug,info",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(Term::stderr().is_term())
                .with_target(false),
        )
        .init();
}
