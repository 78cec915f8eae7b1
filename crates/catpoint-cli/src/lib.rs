//! # catpoint-cli: Catpoint Command-Line Interface
//!
//! Loads a system configuration, replays scripted events through the
//! security service and reports every status change.
//!
//! ## Subcommands
//!
//! - `run` replays an event script and prints the resulting events
//! - `check` validates a system configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Alarm decisions live in `catpoint-state`; nothing here decides.

pub mod check;
pub mod config;
pub mod listener;
pub mod run;
pub mod script;
