use crate::detection::domain::face_aggregator::aggregate_batch;
use crate::detection::domain::face_detector::{DetectionError, FaceDetector, FrameAnalysis};
use crate::detection::domain::feature_region::FeatureRegion;
use crate::detection::domain::landmark_estimator::LandmarkEstimator;
use crate::detection::domain::landmarks::FaceLandmarkSet;
use crate::shared::draw::draw_filled_circle;
use crate::shared::frame::Frame;

/// Landmark radius in the annotated output.
const POINT_RADIUS: i32 = 1;

/// Landmark-based face detector: delegates mesh estimation to a
/// [`LandmarkEstimator`], draws every feature region's landmarks in its
/// catalog color, and aggregates per-region confidences into the batch.
pub struct MeshLandmarkDetector {
    estimator: Box<dyn LandmarkEstimator>,
    released: bool,
}

impl MeshLandmarkDetector {
    pub fn new(estimator: Box<dyn LandmarkEstimator>) -> Self {
        Self {
            estimator,
            released: false,
        }
    }
}

impl FaceDetector for MeshLandmarkDetector {
    fn process(&mut self, frame: &Frame) -> Result<FrameAnalysis, DetectionError> {
        if self.released {
            return Err(DetectionError::Released);
        }

        let sets = self.estimator.estimate(frame)?;

        let mut annotated = frame.clone();
        for set in &sets {
            draw_regions(&mut annotated, set);
        }

        let batch = aggregate_batch(&sets, frame.width(), frame.height())?;
        log::debug!("mesh detector found {} face(s)", batch.count());

        Ok(FrameAnalysis { annotated, batch })
    }

    fn release(&mut self) {
        if !self.released {
            self.estimator.close();
            self.released = true;
        }
    }
}

impl Drop for MeshLandmarkDetector {
    fn drop(&mut self) {
        self.release();
    }
}

fn draw_regions(frame: &mut Frame, set: &FaceLandmarkSet) {
    let (w, h) = (frame.width() as f64, frame.height() as f64);
    for region in FeatureRegion::ALL {
        let color = region.color();
        for &index in region.landmark_indices() {
            // Drawing is a visual side effect; a short set is surfaced by
            // the scorer, not here.
            if let Some(landmark) = set.get(index) {
                let cx = (landmark.x * w).round() as i32;
                let cy = (landmark.y * h).round() as i32;
                draw_filled_circle(frame, cx, cy, POINT_RADIUS, color);
            }
        }
    }
}
