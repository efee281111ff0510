/// Face bounding box in pixel units. Width and height are always
/// positive; producers clamp to the frame before constructing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Per-region confidence scores for one face, plus their mean.
///
/// Only the landmark detector produces these; the cascade fallback has
/// no landmark data to score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionConfidence {
    pub forehead: f64,
    pub eyes: f64,
    pub nose: f64,
    pub chin: f64,
    pub overall: f64,
}

impl RegionConfidence {
    /// `overall` is always the unweighted mean of the four regions.
    pub fn new(forehead: f64, eyes: f64, nose: f64, chin: f64) -> Self {
        Self {
            forehead,
            eyes,
            nose,
            chin,
            overall: (forehead + eyes + nose + chin) / 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetectionResult {
    pub bbox: BoundingBox,
    pub confidence: Option<RegionConfidence>,
}

impl FaceDetectionResult {
    /// Overall confidence for filtering. Faces from the bounding-box-only
    /// detector carry no scores and count as 0.0.
    pub fn overall_confidence(&self) -> f64 {
        self.confidence.map_or(0.0, |c| c.overall)
    }
}

/// All faces found in one frame. The count is the sequence length; there
/// is no separately maintained counter to drift out of sync.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionBatch {
    faces: Vec<FaceDetectionResult>,
}

impl DetectionBatch {
    pub fn new(faces: Vec<FaceDetectionResult>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[FaceDetectionResult] {
        &self.faces
    }

    pub fn count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
