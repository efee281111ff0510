use crate::detection::domain::detection_result::{
    DetectionBatch, FaceDetectionResult, RegionConfidence,
};
use crate::detection::domain::face_detector::DetectionError;
use crate::detection::domain::feature_region::{combined_eye_indices, FeatureRegion};
use crate::detection::domain::landmarks::FaceLandmarkSet;

/// Combines one landmark set into a per-face result: four region scores,
/// their mean, and a bounding box from the landmark extents.
///
/// Returns `None` for a degenerate (empty) set, which the mesh topology
/// never produces but the contract tolerates.
pub fn aggregate_face(
    set: &FaceLandmarkSet,
    frame_width: u32,
    frame_height: u32,
) -> Result<Option<FaceDetectionResult>, DetectionError> {
    let Some(bbox) = set.bounding_box(frame_width, frame_height) else {
        return Ok(None);
    };

    let forehead = set.region_confidence(FeatureRegion::Forehead.landmark_indices())?;
    let eyes = set.region_confidence(&combined_eye_indices())?;
    let nose = set.region_confidence(FeatureRegion::Nose.landmark_indices())?;
    let chin = set.region_confidence(FeatureRegion::Chin.landmark_indices())?;

    Ok(Some(FaceDetectionResult {
        bbox,
        confidence: Some(RegionConfidence::new(forehead, eyes, nose, chin)),
    }))
}

/// Builds the per-frame batch. The count describes this call only; there
/// is no cross-call accumulation.
pub fn aggregate_batch(
    sets: &[FaceLandmarkSet],
    frame_width: u32,
    frame_height: u32,
) -> Result<DetectionBatch, DetectionError> {
    let mut faces = Vec::with_capacity(sets.len());
    for set in sets {
        if let Some(face) = aggregate_face(set, frame_width, frame_height)? {
            faces.push(face);
        }
    }
    Ok(DetectionBatch::new(faces))
}
