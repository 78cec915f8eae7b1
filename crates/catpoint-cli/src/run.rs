//! # Run Subcommand
//!
//! Build the system from a configuration, replay an event script through
//! the security service, print every listener event and the final state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use catpoint_state::SecurityService;

use crate::config::SystemConfig;
use crate::listener::{RecordingListener, TracingStatusListener};
use crate::script::{load_script, replay, ScriptedImageService};

/// Arguments for the `catpoint run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// System configuration file (YAML).
    #[arg(long, short)]
    pub config: PathBuf,

    /// Event script to replay (YAML).
    #[arg(long, short)]
    pub events: PathBuf,

    /// Seed for the fake image analyzer. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the final repository state here as JSON.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

/// Returns the process exit code.
pub fn run_events(args: &RunArgs) -> Result<u8> {
    let config = SystemConfig::load(&args.config)?;
    let events = load_script(&args.events)?;
    let base_dir = args.events.parent().unwrap_or_else(|| Path::new("."));

    let mut service = SecurityService::new(config.to_repository(), ScriptedImageService::new(args.seed));
    let recorder = RecordingListener::new();
    service.add_status_listener(TracingStatusListener);
    service.add_status_listener(recorder.clone());

    tracing::info!(events = events.len(), "replaying event script");
    replay(&mut service, &events, base_dir)?;

    for record in recorder.records() {
        println!("{record}");
    }

    let snapshot = service.repository().snapshot();
    println!(
        "final: arming {}, alarm {} ({}), cat in view: {}",
        snapshot.arming_status,
        snapshot.alarm_status,
        snapshot.alarm_status.description(),
        snapshot.cat_detected
    );
    for sensor in &snapshot.sensors {
        println!("  {sensor}");
    }

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    Ok(0)
}
