//! # catpoint-core: Foundational Types for the Catpoint Security Stack
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: sensors, the arming and alarm status enums, and the camera
//! image payload handed to image analyzers. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** Sensors are keyed by `SensorId`, never by
//!    name. Two sensors sharing a name and type are still distinct entities.
//!
//! 2. **Closed status enums.** `ArmingStatus` and `AlarmStatus` are
//!    exhaustive enums; adding a variant forces every `match` to handle it.
//!
//! 3. **No behavior in the leaf.** `Sensor::set_active()` is a plain field
//!    write. All alarm decisions live in `catpoint-state`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `catpoint-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod image;
pub mod sensor;
pub mod status;

pub use error::CoreError;
pub use image::CameraImage;
pub use sensor::{Sensor, SensorId, SensorType};
pub use status::{AlarmStatus, ArmingStatus};
