//! # catpoint-state: Alarm State Machine
//!
//! Derives the alarm status of the premises from three kinds of input:
//! sensor activations, camera frames and operator arming changes.
//!
//! ## Components
//!
//! - **Repository** (`repository.rs`): the `SecurityRepository` trait that
//!   owns all durable state (sensor set, alarm status, arming status, last
//!   cat verdict), plus `InMemorySecurityRepository`.
//!
//! - **Image analysis** (`image.rs`): the `ImageService` trait and the
//!   `FakeImageService` stand-in classifier.
//!
//! - **Listeners** (`listener.rs`): the `StatusListener` trait notified of
//!   alarm changes, cat verdicts and sensor changes.
//!
//! - **Service** (`service.rs`): `SecurityService`, which owns the
//!   transition rules and nothing else.
//!
//! ## Alarm Transitions
//!
//! ```text
//!            sensor on (armed)          sensor on (armed)
//! NO_ALARM ─────────────────▶ PENDING ─────────────────▶ ALARM
//!    ▲                          │                          │
//!    └──── last sensor off ─────┘                          │
//!    └──────────────────── disarm ─────────────────────────┘
//! ```
//!
//! A cat seen while armed-home jumps straight to ALARM. ALARM only clears
//! on disarm, or when a cat-free frame arrives with every sensor inactive.
//!
//! ## Concurrency
//!
//! Every operation takes `&mut self`, so a single service instance is a
//! critical section by construction. Callers sharing one across threads
//! wrap it in a mutex.

pub mod image;
pub mod listener;
pub mod repository;
pub mod service;

pub use image::{FakeImageService, ImageError, ImageService};
pub use listener::{ListenerError, ListenerId, StatusListener};
pub use repository::{
    InMemorySecurityRepository, RepositoryError, SecurityRepository, SecuritySnapshot,
};
pub use service::{SecurityError, SecurityService, CAT_CONFIDENCE_THRESHOLD};
