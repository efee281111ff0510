use crate::detection::domain::detection_result::BoundingBox;
use crate::detection::domain::face_detector::DetectionError;

/// Number of points in the face-mesh topology.
pub const MESH_LANDMARK_COUNT: usize = 468;

/// One mesh point: coordinates normalized to frame dimensions, plus the
/// estimator's visibility score. All three values live in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub visibility: f64,
}

/// Ordered, fixed-topology landmark sequence for one detected face.
///
/// Transient: produced by the estimator, consumed by scoring and
/// drawing within a single `process()` call, never retained.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarkSet {
    points: Vec<Landmark>,
}

impl FaceLandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Mean visibility over the landmarks at `indices`.
    ///
    /// An empty index list yields 0.0 (no division by zero). An
    /// out-of-range index is a programming error and fails with
    /// [`DetectionError::InvalidLandmarkIndex`] in every build; wrong
    /// indices must never produce a plausible-looking score.
    pub fn region_confidence(&self, indices: &[usize]) -> Result<f64, DetectionError> {
        if indices.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for &index in indices {
            let landmark =
                self.points
                    .get(index)
                    .ok_or(DetectionError::InvalidLandmarkIndex {
                        index,
                        len: self.points.len(),
                    })?;
            total += landmark.visibility;
        }
        Ok(total / indices.len() as f64)
    }

    /// Axis-aligned pixel extents of all landmarks, clamped to the frame
    /// and at least 1x1. `None` for an empty set or a zero-area frame.
    pub fn bounding_box(&self, frame_width: u32, frame_height: u32) -> Option<BoundingBox> {
        if self.points.is_empty() || frame_width == 0 || frame_height == 0 {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.points {
            let px = p.x * frame_width as f64;
            let py = p.y * frame_height as f64;
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
        }

        let x = (min_x.floor() as i32).clamp(0, frame_width as i32 - 1);
        let y = (min_y.floor() as i32).clamp(0, frame_height as i32 - 1);
        let width = ((max_x.ceil() as i32).min(frame_width as i32) - x).max(1);
        let height = ((max_y.ceil() as i32).min(frame_height as i32) - y).max(1);

        Some(BoundingBox {
            x,
            y,
            width,
            height,
        })
    }
}
