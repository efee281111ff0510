use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::infrastructure::cascade_detector::CascadeFaceDetector;
use crate::detection::infrastructure::mesh_detector::MeshLandmarkDetector;
use crate::detection::infrastructure::model_resolver::{self, ProgressFn};
use crate::detection::infrastructure::onnx_facemesh_estimator::OnnxFaceMeshEstimator;
use crate::shared::constants::{
    CASCADE_MODEL_NAME, CASCADE_MODEL_URL, DEFAULT_MAX_FACES, DEFAULT_MIN_DETECTION_CONFIDENCE,
    DEFAULT_MIN_TRACKING_CONFIDENCE, FACE_MESH_MODEL_NAME, FACE_MESH_MODEL_URL,
};

/// Startup-only detector configuration. Thresholds gate the mesh model's
/// acceptance of a face, not the per-region confidence scores.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub max_faces: usize,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_faces: DEFAULT_MAX_FACES,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

/// Creates the best available detector, preferring the landmark variant.
///
/// Probes the mesh capability once: resolve the model, build the ONNX
/// session. If the probe fails, the process permanently falls back to
/// the cascade detector and the unmet capability is logged one time.
/// Errors only when both variants are unconstructable.
pub fn create_detector(
    config: &DetectorConfig,
    progress: Option<ProgressFn>,
) -> Result<Box<dyn FaceDetector>, DetectionError> {
    select_detector(probe_mesh_detector(config, progress.clone()), move || {
        create_cascade_detector(progress)
    })
}

/// Selection policy, separated from the network-touching probes: a
/// successful probe wins, a failed probe falls through to the fallback
/// constructor.
fn select_detector(
    probe: Result<Box<dyn FaceDetector>, DetectionError>,
    fallback: impl FnOnce() -> Result<Box<dyn FaceDetector>, DetectionError>,
) -> Result<Box<dyn FaceDetector>, DetectionError> {
    match probe {
        Ok(detector) => {
            log::info!("using face-mesh landmark detector");
            Ok(detector)
        }
        Err(e) => {
            log::warn!("landmark capability unavailable ({e}), falling back to cascade detector");
            fallback()
        }
    }
}

/// Landmark variant, or `CapabilityUnavailable` when the mesh model or
/// runtime cannot be constructed.
pub fn probe_mesh_detector(
    config: &DetectorConfig,
    progress: Option<ProgressFn>,
) -> Result<Box<dyn FaceDetector>, DetectionError> {
    let model_path = model_resolver::resolve(FACE_MESH_MODEL_NAME, FACE_MESH_MODEL_URL, progress)
        .map_err(|e| DetectionError::CapabilityUnavailable(e.to_string()))?;

    let estimator = OnnxFaceMeshEstimator::new(
        &model_path,
        config.max_faces,
        config.min_detection_confidence,
        config.min_tracking_confidence,
    )?;

    Ok(Box::new(MeshLandmarkDetector::new(Box::new(estimator))))
}

/// Cascade fallback. Still needs its (pure-Rust) model file; failure
/// here means no detector can be built at all.
pub fn create_cascade_detector(
    progress: Option<ProgressFn>,
) -> Result<Box<dyn FaceDetector>, DetectionError> {
    let model_path = model_resolver::resolve(CASCADE_MODEL_NAME, CASCADE_MODEL_URL, progress)
        .map_err(|e| DetectionError::Backend(e.to_string()))?;
    Ok(Box::new(CascadeFaceDetector::new(&model_path)?))
}
