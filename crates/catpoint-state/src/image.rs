//! # Image Analysis Seam
//!
//! The security service never classifies pixels itself. It hands each
//! camera frame to an `ImageService` together with a confidence threshold
//! and acts on the boolean verdict.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use catpoint_core::CameraImage;

/// Errors from an image analyzer backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The payload could not be decoded as an image.
    #[error("unreadable image: {0}")]
    Unreadable(String),

    /// The classifier itself failed (model load, remote call, ...).
    #[error("image analyzer failed: {0}")]
    Backend(String),
}

/// Classifier that decides whether a frame contains a cat.
pub trait ImageService {
    /// `confidence_threshold` is a percentage in `[0, 100]`; the verdict is
    /// `true` only if the classifier's confidence exceeds it.
    fn image_contains_cat(
        &self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ImageError>;
}

/// Stand-in classifier that draws a random confidence for every frame.
///
/// With the default threshold of 50 this says "cat" about half the time.
/// Seed it for reproducible runs.
#[derive(Debug)]
pub struct FakeImageService {
    rng: Mutex<StdRng>,
}

impl FakeImageService {
    /// Entropy-seeded analyzer.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic analyzer: the same seed yields the same verdicts.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for FakeImageService {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageService for FakeImageService {
    fn image_contains_cat(
        &self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, ImageError> {
        if image.is_empty() {
            return Err(ImageError::Unreadable("empty image payload".to_string()));
        }
        let confidence: f32 = self.rng.lock().gen_range(0.0..100.0);
        tracing::trace!(confidence, confidence_threshold, "fake classifier verdict");
        Ok(confidence > confidence_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_is_unreadable() {
        let service = FakeImageService::with_seed(7);
        let result = service.image_contains_cat(&CameraImage::from_bytes(Vec::new()), 50.0);
        assert!(matches!(result, Err(ImageError::Unreadable(_))));
    }

    #[test]
    fn test_seeded_verdicts_are_reproducible() {
        let image = CameraImage::blank(16, 16);
        let a = FakeImageService::with_seed(42);
        let b = FakeImageService::with_seed(42);
        let left: Vec<bool> = (0..32)
            .map(|_| a.image_contains_cat(&image, 50.0).unwrap())
            .collect();
        let right: Vec<bool> = (0..32)
            .map(|_| b.image_contains_cat(&image, 50.0).unwrap())
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_threshold_extremes() {
        let image = CameraImage::blank(4, 4);
        let service = FakeImageService::with_seed(1);
        for _ in 0..50 {
            assert!(!service.image_contains_cat(&image, 100.0).unwrap());
        }
        let mut seen_cat = false;
        for _ in 0..50 {
            seen_cat |= service.image_contains_cat(&image, -1.0).unwrap();
        }
        assert!(seen_cat);
    }
}
