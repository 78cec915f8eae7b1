//! # Error Types
//!
//! Parse failures for the core enums. Everything else in this crate is
//! infallible.

use thiserror::Error;

/// Errors raised while parsing core domain values from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The string does not name a sensor type.
    #[error("unknown sensor type {0:?}; expected DOOR, WINDOW or MOTION")]
    UnknownSensorType(String),

    /// The string does not name an arming status.
    #[error("unknown arming status {0:?}; expected DISARMED, ARMED_HOME or ARMED_AWAY")]
    UnknownArmingStatus(String),

    /// The string does not name an alarm status.
    #[error("unknown alarm status {0:?}; expected NO_ALARM, PENDING_ALARM or ALARM")]
    UnknownAlarmStatus(String),
}
