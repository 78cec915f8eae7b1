//! # Check Subcommand
//!
//! Validate a system configuration without replaying anything.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::SystemConfig;

/// Arguments for the `catpoint check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// System configuration file (YAML).
    #[arg(long, short)]
    pub config: PathBuf,
}

/// Returns the process exit code.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let config = SystemConfig::load(&args.config)?;
    let active = config.sensors.iter().filter(|s| s.active).count();
    println!(
        "OK: {} ({}), alarm {}, {} sensor(s), {} active",
        config.arming_status,
        config.arming_status.description(),
        config.alarm_status,
        config.sensors.len(),
        active
    );
    Ok(0)
}
