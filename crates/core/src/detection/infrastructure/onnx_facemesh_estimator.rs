/// Face-mesh landmark estimator using ONNX Runtime via `ort`.
///
/// Runs a 468-point mesh model over face regions of interest. ROIs are
/// carried across calls (derived from the previous frame's landmark
/// extents), so successive frames of the same face skip re-detection —
/// the reason concurrent `estimate()` calls on one instance would
/// corrupt results and the trait takes `&mut self`.
use std::path::Path;

use crate::detection::domain::face_detector::DetectionError;
use crate::detection::domain::landmark_estimator::LandmarkEstimator;
use crate::detection::domain::landmarks::{FaceLandmarkSet, Landmark, MESH_LANDMARK_COUNT};
use crate::shared::frame::Frame;

/// Mesh model input resolution.
const INPUT_SIZE: u32 = 192;

/// Margin added around landmark extents when deriving the next ROI.
const ROI_MARGIN: f64 = 0.25;

/// IoU above which two candidate faces are considered the same face.
const DEDUP_IOU: f64 = 0.5;

/// Face region of interest in frame-normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Roi {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    tracked: bool,
}

impl Roi {
    fn full_frame() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            tracked: false,
        }
    }

    fn iou(&self, other: &Roi) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        let area_a = self.width * self.height;
        let area_b = other.width * other.height;
        inter / (area_a + area_b - inter)
    }
}

/// Multi-face mesh estimator backed by an ONNX Runtime session.
///
/// The exported mesh model reports a single face-presence score rather
/// than per-point visibility, so that score is applied uniformly as each
/// landmark's visibility. Downstream region confidences therefore track
/// face presence, not per-point occlusion — a known limitation of this
/// model family.
pub struct OnnxFaceMeshEstimator {
    session: Option<ort::session::Session>,
    max_faces: usize,
    min_detection_confidence: f64,
    min_tracking_confidence: f64,
    tracked: Vec<Roi>,
}

impl OnnxFaceMeshEstimator {
    /// Load the mesh ONNX model. Fails with `CapabilityUnavailable` when
    /// the runtime or model cannot be constructed; callers treat that as
    /// the signal to fall back, not as a fatal error.
    pub fn new(
        model_path: &Path,
        max_faces: usize,
        min_detection_confidence: f64,
        min_tracking_confidence: f64,
    ) -> Result<Self, DetectionError> {
        let session = ort::session::Session::builder()
            .and_then(|mut b| b.commit_from_file(model_path))
            .map_err(|e| DetectionError::CapabilityUnavailable(e.to_string()))?;

        Ok(Self {
            session: Some(session),
            max_faces,
            min_detection_confidence,
            min_tracking_confidence,
            tracked: Vec::new(),
        })
    }
}

impl LandmarkEstimator for OnnxFaceMeshEstimator {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<FaceLandmarkSet>, DetectionError> {
        let session = self.session.as_mut().ok_or(DetectionError::Released)?;

        // Re-run last frame's ROIs first, then probe the full frame for
        // faces that are not tracked yet.
        let mut candidates: Vec<Roi> = self.tracked.clone();
        if candidates.len() < self.max_faces {
            candidates.push(Roi::full_frame());
        }

        let mut sets = Vec::new();
        let mut next_tracked: Vec<Roi> = Vec::new();

        for roi in candidates {
            if sets.len() >= self.max_faces {
                break;
            }

            let tensor = preprocess_roi(frame, &roi, INPUT_SIZE);
            let (coords, score) = run_mesh(session, tensor)?;

            let threshold = if roi.tracked {
                self.min_tracking_confidence
            } else {
                self.min_detection_confidence
            };
            if score < threshold {
                continue;
            }

            let set = map_landmarks(&coords, &roi, score);
            let face_roi = roi_from_landmarks(&set, ROI_MARGIN);

            // The full-frame probe can rediscover a face already tracked
            if next_tracked.iter().any(|r| r.iou(&face_roi) > DEDUP_IOU) {
                continue;
            }

            next_tracked.push(face_roi);
            sets.push(set);
        }

        self.tracked = next_tracked;
        Ok(sets)
    }

    fn close(&mut self) {
        self.session = None;
        self.tracked.clear();
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Crop `roi` out of the frame, resize to `size × size`, normalize to
/// [0,1] NCHW float32.
fn preprocess_roi(frame: &Frame, roi: &Roi, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as f64;
    let src_w = frame.width() as f64;
    let s = size as usize;

    let roi_x = roi.x * src_w;
    let roi_y = roi.y * src_h;
    let roi_w = roi.width * src_w;
    let roi_h = roi.height * src_h;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let fy = roi_y + (y as f64 + 0.5) * roi_h / s as f64;
        let src_y = (fy as usize).min(src_h as usize - 1);
        for x in 0..s {
            let fx = roi_x + (x as f64 + 0.5) * roi_w / s as f64;
            let src_x = (fx as usize).min(src_w as usize - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Inference and decoding
// ---------------------------------------------------------------------------

/// Run one mesh inference. Returns crop-space landmark coordinates
/// (1404 floats, x/y/z triplets in 0..INPUT_SIZE) and the face-presence
/// score in [0,1].
fn run_mesh(
    session: &mut ort::session::Session,
    tensor: ndarray::Array4<f32>,
) -> Result<(Vec<f32>, f64), DetectionError> {
    let input = ort::value::Tensor::from_array(tensor)
        .map_err(|e| DetectionError::Backend(e.to_string()))?;
    let outputs = session
        .run(ort::inputs![input])
        .map_err(|e| DetectionError::Backend(e.to_string()))?;

    // Mesh model outputs two tensors:
    // - landmarks: [1, 1404] (468 × x,y,z in crop pixels)
    // - score: [1, 1] (face presence logit)
    if outputs.len() < 2 {
        return Err(DetectionError::Backend(format!(
            "mesh model expected 2 outputs, got {}",
            outputs.len()
        )));
    }

    let landmarks = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| DetectionError::Backend(e.to_string()))?;
    let scores = outputs[1]
        .try_extract_array::<f32>()
        .map_err(|e| DetectionError::Backend(e.to_string()))?;

    let coords = landmarks
        .as_slice()
        .ok_or_else(|| DetectionError::Backend("cannot view landmark output".into()))?;
    if coords.len() < MESH_LANDMARK_COUNT * 3 {
        return Err(DetectionError::Backend(format!(
            "mesh output too short: {} values",
            coords.len()
        )));
    }

    let logit = scores
        .as_slice()
        .and_then(|s| s.first().copied())
        .ok_or_else(|| DetectionError::Backend("cannot view score output".into()))?;

    Ok((coords.to_vec(), sigmoid(logit) as f64))
}

/// Map crop-space coordinates into a frame-normalized landmark set.
fn map_landmarks(coords: &[f32], roi: &Roi, visibility: f64) -> FaceLandmarkSet {
    let points = (0..MESH_LANDMARK_COUNT)
        .map(|i| {
            let cx = coords[i * 3] as f64 / INPUT_SIZE as f64;
            let cy = coords[i * 3 + 1] as f64 / INPUT_SIZE as f64;
            Landmark {
                x: (roi.x + cx * roi.width).clamp(0.0, 1.0),
                y: (roi.y + cy * roi.height).clamp(0.0, 1.0),
                visibility,
            }
        })
        .collect();
    FaceLandmarkSet::new(points)
}

/// Next-frame ROI: landmark extents expanded by `margin` on each side,
/// clamped to the unit square.
fn roi_from_landmarks(set: &FaceLandmarkSet, margin: f64) -> Roi {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in set.points() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let w = max_x - min_x;
    let h = max_y - min_y;
    let x = (min_x - w * margin).max(0.0);
    let y = (min_y - h * margin).max(0.0);
    let x2 = (max_x + w * margin).min(1.0);
    let y2 = (max_y + h * margin).min(1.0);

    Roi {
        x,
        y,
        width: (x2 - x).max(f64::EPSILON),
        height: (y2 - y).max(f64::EPSILON),
        tracked: true,
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, 3)
    }

    #[test]
    fn test_preprocess_shape() {
        let frame = make_frame(200, 100, 128);
        let tensor = preprocess_roi(&frame, &Roi::full_frame(), INPUT_SIZE);
        assert_eq!(tensor.shape(), &[1, 3, 192, 192]);
    }

    #[test]
    fn test_preprocess_normalized() {
        let frame = make_frame(50, 50, 255);
        let tensor = preprocess_roi(&frame, &Roi::full_frame(), INPUT_SIZE);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_preprocess_crops_roi() {
        // Left half black, right half white; an ROI over the right half
        // must sample only white pixels
        let mut frame = make_frame(100, 100, 0);
        {
            let data = frame.data_mut();
            for y in 0..100 {
                for x in 50..100 {
                    let idx = (y * 100 + x) * 3;
                    data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
                }
            }
        }
        let roi = Roi {
            x: 0.5,
            y: 0.0,
            width: 0.5,
            height: 1.0,
            tracked: true,
        };
        let tensor = preprocess_roi(&frame, &roi, INPUT_SIZE);
        assert!((tensor[[0, 0, 96, 96]] - 1.0).abs() < 0.01);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_sigmoid_midpoint_and_saturation() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!((sigmoid(10.0) - 1.0).abs() < 0.001);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_map_landmarks_full_frame_roi() {
        let mut coords = vec![0.0f32; MESH_LANDMARK_COUNT * 3];
        coords[0] = 96.0; // x of landmark 0, crop center
        coords[1] = 48.0; // y of landmark 0
        let set = map_landmarks(&coords, &Roi::full_frame(), 0.9);
        let lm = set.get(0).unwrap();
        assert_relative_eq!(lm.x, 0.5);
        assert_relative_eq!(lm.y, 0.25);
        assert_relative_eq!(lm.visibility, 0.9);
        assert_eq!(set.len(), MESH_LANDMARK_COUNT);
    }

    #[test]
    fn test_map_landmarks_offset_roi() {
        let mut coords = vec![0.0f32; MESH_LANDMARK_COUNT * 3];
        coords[0] = 192.0; // right edge of the crop
        let roi = Roi {
            x: 0.25,
            y: 0.25,
            width: 0.5,
            height: 0.5,
            tracked: true,
        };
        let set = map_landmarks(&coords, &roi, 1.0);
        let lm = set.get(0).unwrap();
        assert_relative_eq!(lm.x, 0.75);
        assert_relative_eq!(lm.y, 0.25);
    }

    #[test]
    fn test_map_landmarks_clamps_to_unit_square() {
        let mut coords = vec![0.0f32; MESH_LANDMARK_COUNT * 3];
        coords[0] = 400.0; // beyond the crop
        let set = map_landmarks(&coords, &Roi::full_frame(), 1.0);
        assert_relative_eq!(set.get(0).unwrap().x, 1.0);
    }

    #[test]
    fn test_roi_from_landmarks_adds_margin() {
        let points = vec![
            Landmark {
                x: 0.4,
                y: 0.4,
                visibility: 1.0,
            },
            Landmark {
                x: 0.6,
                y: 0.6,
                visibility: 1.0,
            },
        ];
        let roi = roi_from_landmarks(&FaceLandmarkSet::new(points), 0.25);
        assert_relative_eq!(roi.x, 0.35, epsilon = 1e-9);
        assert_relative_eq!(roi.y, 0.35, epsilon = 1e-9);
        assert_relative_eq!(roi.width, 0.3, epsilon = 1e-9);
        assert!(roi.tracked);
    }

    #[test]
    fn test_roi_from_landmarks_clamps_at_edges() {
        let points = vec![
            Landmark {
                x: 0.0,
                y: 0.0,
                visibility: 1.0,
            },
            Landmark {
                x: 1.0,
                y: 1.0,
                visibility: 1.0,
            },
        ];
        let roi = roi_from_landmarks(&FaceLandmarkSet::new(points), 0.25);
        assert_relative_eq!(roi.x, 0.0);
        assert_relative_eq!(roi.width, 1.0);
    }

    #[test]
    fn test_roi_iou_identical() {
        let r = Roi {
            x: 0.2,
            y: 0.2,
            width: 0.4,
            height: 0.4,
            tracked: true,
        };
        assert_relative_eq!(r.iou(&r), 1.0);
    }

    #[test]
    fn test_roi_iou_disjoint() {
        let a = Roi {
            x: 0.0,
            y: 0.0,
            width: 0.2,
            height: 0.2,
            tracked: true,
        };
        let b = Roi {
            x: 0.5,
            y: 0.5,
            width: 0.2,
            height: 0.2,
            tracked: true,
        };
        assert_relative_eq!(a.iou(&b), 0.0);
    }
}
