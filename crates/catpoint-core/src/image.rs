//! # Camera Images
//!
//! The payload handed to an image analyzer. The core never inspects the
//! pixels; it only carries them from the camera to the classifier.

use serde::{Deserialize, Serialize};

/// Bytes per pixel of a blank RGB frame.
const RGB_CHANNELS: usize = 3;

/// A single camera frame.
///
/// `width` and `height` are zero when the payload came from an encoded
/// file whose dimensions are unknown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl CameraImage {
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes,
        }
    }

    /// A zeroed RGB frame of the given dimensions.
    pub fn blank(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * RGB_CHANNELS;
        Self::new(width, height, vec![0; len])
    }

    /// Wrap an encoded payload (e.g. a JPEG read from disk).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(0, 0, bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}
