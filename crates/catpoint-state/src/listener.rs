//! # Status Listeners
//!
//! Display and notification layers register listeners with the security
//! service. Every registered listener receives every event exactly once per
//! triggering call. A failing listener is logged and skipped; it never
//! aborts the transition that produced the event.

use thiserror::Error;

use catpoint_core::AlarmStatus;

/// Failure reported by a listener.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    #[error("listener unavailable: {0}")]
    Unavailable(String),

    #[error("listener failed: {0}")]
    Failed(String),
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener:{}", self.0)
    }
}

/// Receiver of security events.
///
/// Implementations must be `Send + Sync` so a service can be moved across
/// threads behind a mutex. Methods take `&self`; listeners that record
/// events use interior mutability.
pub trait StatusListener: Send + Sync {
    /// The alarm status was written.
    fn notify(&self, status: AlarmStatus) -> Result<(), ListenerError>;

    /// A camera frame was analyzed.
    fn cat_detected(&self, detected: bool) -> Result<(), ListenerError>;

    /// The sensor set or a sensor's active flag changed.
    fn sensor_status_changed(&self) -> Result<(), ListenerError> {
        Ok(())
    }
}

impl<L: StatusListener + ?Sized> StatusListener for std::sync::Arc<L> {
    fn notify(&self, status: AlarmStatus) -> Result<(), ListenerError> {
        (**self).notify(status)
    }

    fn cat_detected(&self, detected: bool) -> Result<(), ListenerError> {
        (**self).cat_detected(detected)
    }

    fn sensor_status_changed(&self) -> Result<(), ListenerError> {
        (**self).sensor_status_changed()
    }
}
