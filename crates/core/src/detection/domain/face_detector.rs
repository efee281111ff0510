use thiserror::Error;

use crate::detection::domain::detection_result::DetectionBatch;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectionError {
    /// The landmark capability could not be constructed at startup.
    /// Recoverable: the factory falls back to the cascade detector.
    #[error("landmark capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// `process()` was called after `release()`.
    #[error("detector used after release")]
    Released,

    /// A feature-region index does not exist in the landmark topology.
    /// Always a programming error; never clamped or skipped silently.
    #[error("landmark index {index} out of range for set of {len} landmarks")]
    InvalidLandmarkIndex { index: usize, len: usize },

    /// The underlying detection backend failed on an otherwise valid frame.
    #[error("detection backend failed: {0}")]
    Backend(String),
}

/// Per-frame detector output: the input frame with landmarks or boxes
/// drawn onto a copy, plus the per-face results.
#[derive(Clone, Debug)]
pub struct FrameAnalysis {
    pub annotated: Frame,
    pub batch: DetectionBatch,
}

/// Domain interface for face detection.
///
/// Implementations may be stateful (the landmark variant tracks faces
/// across frames), hence `&mut self`: the borrow rules guarantee at most
/// one in-flight `process()` per instance. Callers that share a detector
/// across threads serialize through a `Mutex`.
///
/// `release()` frees the underlying model resources and is idempotent;
/// any `process()` call after release fails with
/// [`DetectionError::Released`] rather than returning an empty batch.
pub trait FaceDetector: Send {
    fn process(&mut self, frame: &Frame) -> Result<FrameAnalysis, DetectionError>;

    fn release(&mut self);
}
