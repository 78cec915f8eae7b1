//! # Arming and Alarm Status
//!
//! Two small enums carry the whole observable state of the system:
//!
//! - `ArmingStatus` is chosen by the operator (disarmed, armed at home,
//!   armed away).
//! - `AlarmStatus` is derived by the security service from sensor and
//!   camera events.
//!
//! ## Escalation
//!
//! ```text
//! NO_ALARM ──escalate()──▶ PENDING_ALARM ──escalate()──▶ ALARM ──▶ ALARM
//! ```
//!
//! Downgrades are never expressed here; they are decisions of the service.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ─── Arming Status ───────────────────────────────────────────────────

/// Whether the system is disarmed or armed in a given mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    /// Alarm logic is bypassed; the alarm status is pinned to `NoAlarm`.
    #[default]
    Disarmed,
    /// Armed with occupants at home. Cat detection escalates to `Alarm`.
    ArmedHome,
    /// Armed with the premises empty.
    ArmedAway,
}

impl ArmingStatus {
    /// All arming statuses, in declaration order.
    pub const ALL: [ArmingStatus; 3] = [Self::Disarmed, Self::ArmedHome, Self::ArmedAway];

    /// Whether sensor and camera events may raise the alarm status.
    pub fn is_armed(&self) -> bool {
        !matches!(self, Self::Disarmed)
    }

    /// Label shown by display layers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Disarmed => "Disarmed",
            Self::ArmedHome => "Armed - At Home",
            Self::ArmedAway => "Armed - Away",
        }
    }

    /// Canonical upper-case name (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disarmed => "DISARMED",
            Self::ArmedHome => "ARMED_HOME",
            Self::ArmedAway => "ARMED_AWAY",
        }
    }
}

impl std::fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownArmingStatus(s.to_string()))
    }
}

// ─── Alarm Status ────────────────────────────────────────────────────

/// Current severity of the detected intrusion condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    PendingAlarm,
    Alarm,
}

impl AlarmStatus {
    /// All alarm statuses, in escalation order.
    pub const ALL: [AlarmStatus; 3] = [Self::NoAlarm, Self::PendingAlarm, Self::Alarm];

    /// Numeric severity: 0, 1 or 2.
    pub fn severity(&self) -> u8 {
        match self {
            Self::NoAlarm => 0,
            Self::PendingAlarm => 1,
            Self::Alarm => 2,
        }
    }

    /// Next status up the escalation ladder. `Alarm` is the ceiling.
    pub fn escalate(&self) -> Self {
        match self {
            Self::NoAlarm => Self::PendingAlarm,
            Self::PendingAlarm | Self::Alarm => Self::Alarm,
        }
    }

    /// Label shown by display layers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoAlarm => "Cool and Good",
            Self::PendingAlarm => "I'm in Danger...",
            Self::Alarm => "Awooga!",
        }
    }

    /// Canonical upper-case name (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAlarm => "NO_ALARM",
            Self::PendingAlarm => "PENDING_ALARM",
            Self::Alarm => "ALARM",
        }
    }
}

impl std::fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownAlarmStatus(s.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
