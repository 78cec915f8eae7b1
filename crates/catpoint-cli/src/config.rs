//! # System Configuration
//!
//! The YAML file describing the initial state of a premises:
//!
//! ```yaml
//! arming_status: ARMED_HOME
//! alarm_status: NO_ALARM
//! sensors:
//!   - { name: Front Door, type: DOOR }
//!   - { name: Hallway, type: MOTION, active: true }
//! ```
//!
//! Every field is optional; an empty file describes a disarmed system with
//! no sensors.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use catpoint_core::{AlarmStatus, ArmingStatus, Sensor, SensorType};
use catpoint_state::{InMemorySecurityRepository, SecuritySnapshot};

/// One configured sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    #[serde(default)]
    pub active: bool,
}

/// Initial state of the system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub arming_status: ArmingStatus,
    #[serde(default)]
    pub alarm_status: AlarmStatus,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

impl SystemConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Parse and validate configuration text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // serde_yaml maps an empty document to null, not an empty mapping.
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).context("failed to parse YAML")?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check names are present and unique, and that a disarmed system is
    /// not configured with a raised alarm.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if sensor.name.trim().is_empty() {
                bail!("sensor names must not be empty");
            }
            if !seen.insert(sensor.name.as_str()) {
                bail!("duplicate sensor name {:?}", sensor.name);
            }
        }
        if !self.arming_status.is_armed() && self.alarm_status != AlarmStatus::NoAlarm {
            bail!(
                "alarm status {} is not allowed while {}",
                self.alarm_status,
                self.arming_status
            );
        }
        Ok(())
    }

    /// Build the initial repository state.
    pub fn to_snapshot(&self) -> SecuritySnapshot {
        let sensors = self
            .sensors
            .iter()
            .map(|cfg| {
                let mut sensor = Sensor::new(cfg.name.clone(), cfg.sensor_type);
                sensor.set_active(cfg.active);
                sensor
            })
            .collect();
        SecuritySnapshot {
            arming_status: self.arming_status,
            alarm_status: self.alarm_status,
            cat_detected: false,
            sensors,
        }
    }

    pub fn to_repository(&self) -> InMemorySecurityRepository {
        InMemorySecurityRepository::from_snapshot(self.to_snapshot())
    }
}
