//! # Security Repository
//!
//! The durable store behind the security service. The service reads the
//! current alarm status, arming status and sensor set from here on every
//! call and writes its decisions back; it keeps no copy of its own.
//!
//! ## Implementations
//!
//! - `InMemorySecurityRepository`: `RwLock`-guarded maps, cheaply
//!   cloneable, all clones share the same state. Used by tests and the CLI.
//!
//! Durable backends implement the same trait and surface their I/O
//! failures as `RepositoryError::Storage`.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use catpoint_core::{AlarmStatus, ArmingStatus, Sensor, SensorId};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors surfaced by a repository backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The sensor is not part of the registered sensor set.
    #[error("sensor {0} is not registered")]
    SensorNotFound(SensorId),

    /// The backing store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

// ─── Trait ───────────────────────────────────────────────────────────

/// Store of the sensor set, alarm status, arming status and the last
/// image-analysis verdict.
pub trait SecurityRepository {
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError>;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError>;

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError>;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError>;

    /// All registered sensors. Order is unspecified.
    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError>;

    /// Register a sensor. Re-adding an existing id replaces the entry.
    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError>;

    /// Unregister a sensor. Unknown ids are ignored.
    fn remove_sensor(&mut self, id: &SensorId) -> Result<(), RepositoryError>;

    /// Overwrite a registered sensor's stored state.
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError>;

    /// Whether the most recent analyzed frame contained a cat.
    fn cat_detected(&self) -> Result<bool, RepositoryError>;

    fn set_cat_detected(&mut self, detected: bool) -> Result<(), RepositoryError>;
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// Serializable copy of everything a repository holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySnapshot {
    pub arming_status: ArmingStatus,
    pub alarm_status: AlarmStatus,
    #[serde(default)]
    pub cat_detected: bool,
    /// Sorted by name, then type, then id.
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

// ─── In-Memory Implementation ────────────────────────────────────────

#[derive(Debug, Default)]
struct Inner {
    sensors: BTreeMap<SensorId, Sensor>,
    alarm_status: AlarmStatus,
    arming_status: ArmingStatus,
    cat_detected: bool,
}

/// Repository holding all state in memory.
///
/// Cheaply cloneable via `Arc`. All clones share the same data, so a test
/// can keep one handle while the service owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecurityRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemorySecurityRepository {
    /// Empty repository: disarmed, no alarm, no sensors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated from a snapshot.
    pub fn from_snapshot(snapshot: SecuritySnapshot) -> Self {
        let sensors = snapshot
            .sensors
            .into_iter()
            .map(|sensor| (sensor.id(), sensor))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                sensors,
                alarm_status: snapshot.alarm_status,
                arming_status: snapshot.arming_status,
                cat_detected: snapshot.cat_detected,
            })),
        }
    }

    /// Copy the current state out.
    pub fn snapshot(&self) -> SecuritySnapshot {
        let inner = self.inner.read();
        let mut sensors: Vec<Sensor> = inner.sensors.values().cloned().collect();
        sensors.sort();
        SecuritySnapshot {
            arming_status: inner.arming_status,
            alarm_status: inner.alarm_status,
            cat_detected: inner.cat_detected,
            sensors,
        }
    }

    /// Look up a registered sensor by id.
    pub fn sensor(&self, id: &SensorId) -> Option<Sensor> {
        self.inner.read().sensors.get(id).cloned()
    }

    /// Look up the first registered sensor with the given name.
    pub fn find_sensor_by_name(&self, name: &str) -> Option<Sensor> {
        self.inner
            .read()
            .sensors
            .values()
            .find(|sensor| sensor.name() == name)
            .cloned()
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn alarm_status(&self) -> Result<AlarmStatus, RepositoryError> {
        Ok(self.inner.read().alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), RepositoryError> {
        self.inner.write().alarm_status = status;
        Ok(())
    }

    fn arming_status(&self) -> Result<ArmingStatus, RepositoryError> {
        Ok(self.inner.read().arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), RepositoryError> {
        self.inner.write().arming_status = status;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, RepositoryError> {
        Ok(self.inner.read().sensors.values().cloned().collect())
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), RepositoryError> {
        self.inner.write().sensors.insert(sensor.id(), sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, id: &SensorId) -> Result<(), RepositoryError> {
        self.inner.write().sensors.remove(id);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write();
        match inner.sensors.get_mut(&sensor.id()) {
            Some(stored) => {
                *stored = sensor.clone();
                Ok(())
            }
            None => Err(RepositoryError::SensorNotFound(sensor.id())),
        }
    }

    fn cat_detected(&self) -> Result<bool, RepositoryError> {
        Ok(self.inner.read().cat_detected)
    }

    fn set_cat_detected(&mut self, detected: bool) -> Result<(), RepositoryError> {
        self.inner.write().cat_detected = detected;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
