//! # catpoint CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catpoint_cli::check::{run_check, CheckArgs};
use catpoint_cli::run::{run_events, RunArgs};

/// Catpoint home security CLI.
///
/// Replays sensor, camera and arming events through the alarm state
/// machine and reports every status change.
#[derive(Parser, Debug)]
#[command(name = "catpoint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an event script against a system configuration.
    Run(RunArgs),

    /// Validate a system configuration.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("catpoint CLI starting");

    let result = match cli.command {
        Commands::Run(args) => run_events(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_run() {
        let cli = Cli::try_parse_from([
            "catpoint",
            "run",
            "--config",
            "system.yaml",
            "--events",
            "events.yaml",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("system.yaml"));
                assert_eq!(args.events, PathBuf::from("events.yaml"));
                assert_eq!(args.seed, Some(7));
                assert!(args.snapshot.is_none());
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_check_with_verbosity() {
        let cli = Cli::try_parse_from(["catpoint", "-vv", "check", "-c", "system.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn cli_run_requires_events() {
        assert!(Cli::try_parse_from(["catpoint", "run", "--config", "system.yaml"]).is_err());
    }
}
