//! # Security Service
//!
//! Owns the rules that turn sensor activity, camera verdicts and arming
//! changes into an alarm status. Every call reads the current state from
//! the repository, decides, writes the decision back and notifies
//! listeners before returning. The service keeps no alarm state between
//! calls.
//!
//! ## Sensor Rules
//!
//! | Arming   | Sensor change       | Alarm before  | Alarm after   |
//! |----------|---------------------|---------------|---------------|
//! | disarmed | any                 | any           | unchanged     |
//! | armed    | inactive → active   | NO_ALARM      | PENDING_ALARM |
//! | armed    | inactive → active   | PENDING_ALARM | ALARM         |
//! | armed    | active → active     | PENDING_ALARM | ALARM         |
//! | armed    | active → inactive   | PENDING_ALARM | NO_ALARM if no other sensor is active |
//! | armed    | anything else       | any           | unchanged     |
//!
//! ALARM is sticky against sensor events.
//!
//! ## Camera Rules
//!
//! - Cat while armed-home → ALARM.
//! - No cat and every sensor inactive → NO_ALARM.
//! - Otherwise unchanged.
//!
//! The verdict is stored in the repository so that arming home later while
//! a cat is in view also raises ALARM.
//!
//! ## Failures
//!
//! A collaborator error aborts the call. Writes already made by that call
//! are undone before the error is returned, and listeners hear only about
//! changes that were fully persisted.
//!
//! ## Arming Rules
//!
//! - Disarm → NO_ALARM, always written.
//! - Arm (home or away) → every sensor reset to inactive without going
//!   through the sensor rules.
//!
//! Sensor rules judge the prior state from the stored sensor, never from
//! the caller's copy.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use catpoint_core::{AlarmStatus, ArmingStatus, CameraImage, Sensor, SensorId};

use crate::image::{ImageError, ImageService};
use crate::listener::{ListenerError, ListenerId, StatusListener};
use crate::repository::{RepositoryError, SecurityRepository};

/// Confidence (percent) the image analyzer must exceed to report a cat.
pub const CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

// ─── Errors ──────────────────────────────────────────────────────────

/// Collaborator failure that aborted a security operation.
#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("image analysis error: {0}")]
    Image(#[from] ImageError),
}

// ─── Service ─────────────────────────────────────────────────────────

/// Alarm state machine over a repository and an image analyzer.
pub struct SecurityService<R, I> {
    repository: R,
    image_service: I,
    listeners: Vec<(ListenerId, Box<dyn StatusListener>)>,
    next_listener_id: u64,
}

impl<R, I> std::fmt::Debug for SecurityService<R, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityService")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<R: SecurityRepository, I: ImageService> SecurityService<R, I> {
    pub fn new(repository: R, image_service: I) -> Self {
        Self {
            repository,
            image_service,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    // ── Listener registry ────────────────────────────────────────────

    /// Register a listener. The returned id unregisters it.
    pub fn add_status_listener<L: StatusListener + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister a listener. Returns `false` if the id was unknown.
    pub fn remove_status_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current alarm status as stored in the repository.
    pub fn alarm_status(&self) -> Result<AlarmStatus, SecurityError> {
        Ok(self.repository.alarm_status()?)
    }

    /// Current arming mode as stored in the repository.
    pub fn arming_status(&self) -> Result<ArmingStatus, SecurityError> {
        Ok(self.repository.arming_status()?)
    }

    /// Every registered sensor with its stored activation flag.
    pub fn sensors(&self) -> Result<Vec<Sensor>, SecurityError> {
        Ok(self.repository.sensors()?)
    }

    // ── Sensor set ───────────────────────────────────────────────────

    /// Register a sensor. Has no effect on the alarm status.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), SecurityError> {
        debug!(sensor = %sensor.id(), name = sensor.name(), "adding sensor");
        self.repository.add_sensor(sensor)?;
        self.broadcast("sensor_status_changed", |l| l.sensor_status_changed());
        Ok(())
    }

    /// Unregister a sensor. Has no effect on the alarm status.
    pub fn remove_sensor(&mut self, id: &SensorId) -> Result<(), SecurityError> {
        debug!(sensor = %id, "removing sensor");
        self.repository.remove_sensor(id)?;
        self.broadcast("sensor_status_changed", |l| l.sensor_status_changed());
        Ok(())
    }

    // ── Arming ───────────────────────────────────────────────────────

    /// Change the arming mode.
    ///
    /// Disarming always writes NO_ALARM. Arming resets every sensor to
    /// inactive, and arming home while the last frame showed a cat raises
    /// ALARM. A failed write undoes the earlier writes of the same call.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), SecurityError> {
        let previous = self.repository.arming_status()?;
        let alarm = self.repository.alarm_status()?;

        if status == ArmingStatus::Disarmed {
            // DISARMED is never stored next to a raised alarm.
            self.repository.set_alarm_status(AlarmStatus::NoAlarm)?;
            if let Err(error) = self.repository.set_arming_status(status) {
                let undone = self.repository.set_alarm_status(alarm);
                log_rollback("alarm_status", undone);
                return Err(error.into());
            }
            info!(from = %previous, to = %status, "arming status changed");
            self.announce_alarm(alarm, AlarmStatus::NoAlarm);
            return Ok(());
        }

        let cat_in_view = self.repository.cat_detected()?;
        let active: Vec<Sensor> = self
            .repository
            .sensors()?
            .into_iter()
            .filter(Sensor::is_active)
            .collect();
        let raise = status == ArmingStatus::ArmedHome && cat_in_view && alarm != AlarmStatus::Alarm;

        self.arm(status, previous, &active, raise)?;

        info!(from = %previous, to = %status, "arming status changed");
        if !active.is_empty() {
            debug!(count = active.len(), "reset active sensors on arming");
            self.broadcast("sensor_status_changed", |l| l.sensor_status_changed());
        }
        if raise {
            self.announce_alarm(alarm, AlarmStatus::Alarm);
        }
        Ok(())
    }

    /// Reset `active`, persist the arming mode, then raise ALARM if asked.
    /// Each failure restores what the earlier steps wrote.
    fn arm(
        &mut self,
        status: ArmingStatus,
        previous: ArmingStatus,
        active: &[Sensor],
        raise: bool,
    ) -> Result<(), RepositoryError> {
        for (done, sensor) in active.iter().enumerate() {
            let mut reset = sensor.clone();
            reset.set_active(false);
            if let Err(error) = self.repository.update_sensor(&reset) {
                self.restore_sensors(&active[..done]);
                return Err(error);
            }
        }
        if let Err(error) = self.repository.set_arming_status(status) {
            self.restore_sensors(active);
            return Err(error);
        }
        if raise {
            if let Err(error) = self.repository.set_alarm_status(AlarmStatus::Alarm) {
                let undone = self.repository.set_arming_status(previous);
                log_rollback("arming_status", undone);
                self.restore_sensors(active);
                return Err(error);
            }
        }
        Ok(())
    }

    // ── Sensors ──────────────────────────────────────────────────────

    /// Apply a sensor activation change.
    ///
    /// The prior state comes from the repository, not from `sensor`, so a
    /// copy taken before arming reset it is still judged correctly. On
    /// success the caller's copy is brought in line with the stored one.
    /// Toggling to the state the sensor already has is a no-op, except that
    /// re-activating an active sensor while PENDING_ALARM escalates to
    /// ALARM.
    pub fn change_sensor_activation_status(
        &mut self,
        sensor: &mut Sensor,
        active: bool,
    ) -> Result<(), SecurityError> {
        let stored = self.stored_sensor(sensor.id())?;
        let was_active = stored.is_active();
        let arming = self.repository.arming_status()?;
        let alarm = self.repository.alarm_status()?;

        let next = if arming.is_armed() {
            self.sensor_transition(stored.id(), alarm, was_active, active)?
        } else {
            debug!(sensor = %stored.id(), "system disarmed; alarm logic bypassed");
            None
        };

        if was_active == active && next.is_none() {
            debug!(sensor = %stored.id(), active, "sensor already in requested state");
            sensor.set_active(active);
            return Ok(());
        }

        if was_active != active {
            let mut updated = stored.clone();
            updated.set_active(active);
            self.repository.update_sensor(&updated)?;
        }
        if let Some(status) = next {
            if let Err(error) = self.repository.set_alarm_status(status) {
                if was_active != active {
                    let undone = self.repository.update_sensor(&stored);
                    log_rollback("sensor", undone);
                }
                return Err(error.into());
            }
        }
        sensor.set_active(active);

        if let Some(status) = next {
            self.announce_alarm(alarm, status);
        }
        if was_active != active {
            self.broadcast("sensor_status_changed", |l| l.sensor_status_changed());
        }
        Ok(())
    }

    fn stored_sensor(&self, id: SensorId) -> Result<Sensor, SecurityError> {
        self.repository
            .sensors()?
            .into_iter()
            .find(|candidate| candidate.id() == id)
            .ok_or_else(|| RepositoryError::SensorNotFound(id).into())
    }

    fn sensor_transition(
        &self,
        id: SensorId,
        alarm: AlarmStatus,
        was_active: bool,
        active: bool,
    ) -> Result<Option<AlarmStatus>, SecurityError> {
        let next = match (alarm, was_active, active) {
            (AlarmStatus::Alarm, _, _) => None,
            (AlarmStatus::NoAlarm, false, true) => Some(AlarmStatus::PendingAlarm),
            (AlarmStatus::PendingAlarm, _, true) => Some(AlarmStatus::Alarm),
            (AlarmStatus::PendingAlarm, true, false) => {
                let others_active = self
                    .repository
                    .sensors()?
                    .iter()
                    .any(|other| other.id() != id && other.is_active());
                if others_active {
                    debug!(sensor = %id, "other sensors still active; alarm stays pending");
                    None
                } else {
                    Some(AlarmStatus::NoAlarm)
                }
            }
            _ => None,
        };
        Ok(next)
    }

    // ── Camera ───────────────────────────────────────────────────────

    /// Analyze a camera frame and apply the verdict. Returns the verdict.
    pub fn process_image(&mut self, image: &CameraImage) -> Result<bool, SecurityError> {
        let cat = self
            .image_service
            .image_contains_cat(image, CAT_CONFIDENCE_THRESHOLD)?;
        let arming = self.repository.arming_status()?;
        let alarm = self.repository.alarm_status()?;
        let previous_cat = self.repository.cat_detected()?;

        let verdict = if cat {
            (arming == ArmingStatus::ArmedHome).then_some(AlarmStatus::Alarm)
        } else {
            let all_inactive = self.repository.sensors()?.iter().all(|s| !s.is_active());
            all_inactive.then_some(AlarmStatus::NoAlarm)
        };
        let next = verdict.filter(|status| *status != alarm);

        self.repository.set_cat_detected(cat)?;
        match next {
            Some(status) => {
                if let Err(error) = self.repository.set_alarm_status(status) {
                    let undone = self.repository.set_cat_detected(previous_cat);
                    log_rollback("cat_detected", undone);
                    return Err(error.into());
                }
                self.announce_alarm(alarm, status);
            }
            None => debug!(cat, %arming, %alarm, "image verdict leaves alarm unchanged"),
        }

        self.broadcast("cat_detected", |l| l.cat_detected(cat));
        Ok(cat)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn image_service(&self) -> &I {
        &self.image_service
    }

    /// Drop the listeners and hand back the collaborators.
    pub fn into_parts(self) -> (R, I) {
        (self.repository, self.image_service)
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Log a persisted alarm transition and tell every listener.
    fn announce_alarm(&self, from: AlarmStatus, to: AlarmStatus) {
        info!(%from, %to, "alarm status changed");
        self.broadcast("notify", |l| l.notify(to));
    }

    fn restore_sensors(&mut self, sensors: &[Sensor]) {
        for sensor in sensors {
            let undone = self.repository.update_sensor(sensor);
            log_rollback("sensor", undone);
        }
    }

    fn broadcast<F>(&self, event: &'static str, mut deliver: F)
    where
        F: FnMut(&dyn StatusListener) -> Result<(), ListenerError>,
    {
        for (id, listener) in &self.listeners {
            if let Err(error) = deliver(listener.as_ref()) {
                warn!(listener = %id, event, %error, "status listener failed");
            }
        }
    }
}

/// An undo write that failed leaves the repository partially updated. The
/// caller still sees the original error.
fn log_rollback(step: &'static str, result: Result<(), RepositoryError>) {
    if let Err(error) = result {
        error!(step, %error, "rollback failed; repository holds a partial update");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
