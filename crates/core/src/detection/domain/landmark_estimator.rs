use crate::detection::domain::face_detector::DetectionError;
use crate::detection::domain::landmarks::FaceLandmarkSet;
use crate::shared::frame::Frame;

/// Domain interface for the multi-face mesh landmark capability.
///
/// Implementations hold model state and may track faces across
/// successive calls (temporal ROI reuse), hence `&mut self`.
/// `close()` frees model resources; `estimate()` after close fails
/// with [`DetectionError::Released`].
pub trait LandmarkEstimator: Send {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<FaceLandmarkSet>, DetectionError>;

    fn close(&mut self);
}
