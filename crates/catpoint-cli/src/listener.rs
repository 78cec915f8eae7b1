//! # CLI Status Listeners
//!
//! - `TracingStatusListener` logs each event as it happens.
//! - `RecordingListener` keeps a timestamped log for the end-of-run report.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use catpoint_core::AlarmStatus;
use catpoint_state::{ListenerError, StatusListener};

/// Logs every event at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatusListener;

impl StatusListener for TracingStatusListener {
    fn notify(&self, status: AlarmStatus) -> Result<(), ListenerError> {
        tracing::info!(%status, description = status.description(), "alarm status");
        Ok(())
    }

    fn cat_detected(&self, detected: bool) -> Result<(), ListenerError> {
        tracing::info!(detected, "camera verdict");
        Ok(())
    }

    fn sensor_status_changed(&self) -> Result<(), ListenerError> {
        tracing::debug!("sensor set changed");
        Ok(())
    }
}

/// What a listener was told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    Alarm(AlarmStatus),
    Cat(bool),
    Sensors,
}

impl std::fmt::Display for ListenerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alarm(status) => write!(f, "alarm  {status} ({})", status.description()),
            Self::Cat(true) => f.write_str("camera cat detected"),
            Self::Cat(false) => f.write_str("camera no cat"),
            Self::Sensors => f.write_str("sensors changed"),
        }
    }
}

/// A listener event with the time it was received.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    pub event: ListenerEvent,
}

impl std::fmt::Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.at.format("%Y-%m-%dT%H:%M:%S%.3fZ"), self.event)
    }
}

/// Collects events into a log shared with its clones.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    log: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.log.lock().clone()
    }

    pub fn events(&self) -> Vec<ListenerEvent> {
        self.log.lock().iter().map(|record| record.event).collect()
    }

    fn push(&self, event: ListenerEvent) {
        self.log.lock().push(EventRecord {
            at: Utc::now(),
            event,
        });
    }
}

impl StatusListener for RecordingListener {
    fn notify(&self, status: AlarmStatus) -> Result<(), ListenerError> {
        self.push(ListenerEvent::Alarm(status));
        Ok(())
    }

    fn cat_detected(&self, detected: bool) -> Result<(), ListenerError> {
        self.push(ListenerEvent::Cat(detected));
        Ok(())
    }

    fn sensor_status_changed(&self) -> Result<(), ListenerError> {
        self.push(ListenerEvent::Sensors);
        Ok(())
    }
}
