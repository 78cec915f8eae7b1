//! # Sensors
//!
//! A sensor is a named, typed, binary-state detector (door contact, window
//! contact, motion detector). Sensors are created by configuration, stored
//! in the repository's sensor set and toggled by the security service.
//!
//! ## Identity
//!
//! Identity is the `SensorId`. Equality and hashing ignore the name, type
//! and active flag, so a sensor whose `active` field changed is still the
//! same entity in a set or map.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ─── Sensor Identity ─────────────────────────────────────────────────

/// Unique identifier for a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SensorId(pub Uuid);

impl SensorId {
    /// Generate a new random sensor identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SensorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sensor:{}", self.0)
    }
}

// ─── Sensor Type ─────────────────────────────────────────────────────

/// The kind of physical detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    /// Door contact.
    Door,
    /// Window contact.
    Window,
    /// Motion detector.
    Motion,
}

impl SensorType {
    /// All sensor types, in declaration order.
    pub const ALL: [SensorType; 3] = [Self::Door, Self::Window, Self::Motion];

    /// Canonical upper-case name (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Window => "WINDOW",
            Self::Motion => "MOTION",
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownSensorType(s.to_string()))
    }
}

// ─── Sensor ──────────────────────────────────────────────────────────

/// A registered detector and its current activation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    id: SensorId,
    name: String,
    sensor_type: SensorType,
    #[serde(default)]
    active: bool,
}

impl Sensor {
    /// Create an inactive sensor with a fresh identifier.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self::with_id(SensorId::new(), name, sensor_type)
    }

    /// Create an inactive sensor with a caller-chosen identifier.
    pub fn with_id(id: SensorId, name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            id,
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Overwrite the activation flag. No side effects.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensor {
    // Display order; the id tiebreak keeps Ord consistent with Eq.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.sensor_type.cmp(&other.sensor_type))
            .then(self.id.cmp(&other.id))
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        write!(f, "{} ({}, {state})", self.name, self.sensor_type)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
