//! # Event Scripts
//!
//! A YAML list of events replayed in order through the security service:
//!
//! ```yaml
//! - { event: arm, status: ARMED_HOME }
//! - { event: sensor, name: Front Door, active: true }
//! - { event: image, path: frames/porch.jpg }
//! - { event: image, cat: true }
//! - { event: add_sensor, name: Garage, type: DOOR }
//! - { event: remove_sensor, name: Garage }
//! ```
//!
//! Image events read `path` relative to the script's directory, or use a
//! blank 256x256 frame. `cat` forces the analyzer verdict for that frame;
//! without it the seeded fake analyzer decides.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use serde::Deserialize;

use catpoint_core::{ArmingStatus, CameraImage, Sensor, SensorType};
use catpoint_state::{
    FakeImageService, ImageError, ImageService, InMemorySecurityRepository, SecurityService,
};

/// Frame used when an image event names no file.
const BLANK_FRAME_SIZE: u32 = 256;

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Arm {
        status: ArmingStatus,
    },
    Sensor {
        name: String,
        active: bool,
    },
    Image {
        #[serde(default)]
        path: Option<PathBuf>,
        #[serde(default)]
        cat: Option<bool>,
    },
    AddSensor {
        name: String,
        #[serde(rename = "type")]
        sensor_type: SensorType,
    },
    RemoveSensor {
        name: String,
    },
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events: {}", path.display()))?;
    parse_script(&content).with_context(|| format!("invalid events: {}", path.display()))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(content).context("failed to parse YAML")
}

// ─── Analyzer ────────────────────────────────────────────────────────

/// Fake analyzer whose next verdict can be pinned by the script.
#[derive(Debug)]
pub struct ScriptedImageService {
    fallback: FakeImageService,
    forced: Mutex<Option<bool>>,
}

impl ScriptedImageService {
    pub fn new(seed: Option<u64>) -> Self {
        let fallback = match seed {
            Some(seed) => FakeImageService::with_seed(seed),
            None => FakeImageService::new(),
        };
        Self {
            fallback,
            forced: Mutex::new(None),
        }
    }

    /// Pin the verdict of the next analyzed frame.
    pub fn force_next(&self, verdict: Option<bool>) {
        *self.forced.lock() = verdict;
    }
}

impl ImageService for ScriptedImageService {
    fn image_contains_cat(
        &self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ImageError> {
        match self.forced.lock().take() {
            Some(verdict) => Ok(verdict),
            None => self.fallback.image_contains_cat(image, confidence_threshold),
        }
    }
}

// ─── Replay ──────────────────────────────────────────────────────────

pub type ScriptedService = SecurityService<InMemorySecurityRepository, ScriptedImageService>;

/// Apply every event in order. Stops at the first failing event.
pub fn replay(service: &mut ScriptedService, events: &[ScriptEvent], base_dir: &Path) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        tracing::debug!(index, ?event, "replaying event");
        apply(service, event, base_dir).with_context(|| format!("event #{} failed", index + 1))?;
    }
    Ok(())
}

fn apply(service: &mut ScriptedService, event: &ScriptEvent, base_dir: &Path) -> Result<()> {
    match event {
        ScriptEvent::Arm { status } => service.set_arming_status(*status)?,
        ScriptEvent::Sensor { name, active } => {
            let mut sensor = find_sensor(service, name)?;
            service.change_sensor_activation_status(&mut sensor, *active)?;
        }
        ScriptEvent::Image { path, cat } => {
            let image = match path {
                Some(path) => {
                    let full = base_dir.join(path);
                    let bytes = std::fs::read(&full)
                        .with_context(|| format!("failed to read image: {}", full.display()))?;
                    CameraImage::from_bytes(bytes)
                }
                None => CameraImage::blank(BLANK_FRAME_SIZE, BLANK_FRAME_SIZE),
            };
            service.image_service().force_next(*cat);
            service.process_image(&image)?;
        }
        ScriptEvent::AddSensor { name, sensor_type } => {
            if service.repository().find_sensor_by_name(name).is_some() {
                return Err(anyhow!("sensor {name:?} already exists"));
            }
            service.add_sensor(Sensor::new(name.clone(), *sensor_type))?;
        }
        ScriptEvent::RemoveSensor { name } => {
            let sensor = find_sensor(service, name)?;
            service.remove_sensor(&sensor.id())?;
        }
    }
    Ok(())
}

fn find_sensor(service: &ScriptedService, name: &str) -> Result<Sensor> {
    service
        .repository()
        .find_sensor_by_name(name)
        .ok_or_else(|| anyhow!("unknown sensor {name:?}"))
}
