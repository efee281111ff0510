use crate::detection::domain::detection_result::DetectionBatch;

/// Number of faces whose overall confidence strictly exceeds `threshold`.
///
/// The threshold is caller-supplied and intentionally not clamped;
/// passing a value outside [0, 1] simply matches nothing or everything.
/// Faces without region confidences score 0.0 and are excluded at any
/// threshold >= 0.0.
pub fn filter_count(batch: &DetectionBatch, threshold: f64) -> usize {
    batch
        .faces()
        .iter()
        .filter(|face| face.overall_confidence() > threshold)
        .count()
}
