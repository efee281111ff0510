/// Fallback face detector backed by the `rustface` crate (SeetaFace FuSt
/// cascade over grayscale).
///
/// Bounding boxes only — no landmarks, no region confidences. Carries no
/// detection state between calls: a fresh cascade is built from the
/// shared model each time, so identical frames yield identical results.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::detection::domain::detection_result::{
    BoundingBox, DetectionBatch, FaceDetectionResult,
};
use crate::detection::domain::face_detector::{DetectionError, FaceDetector, FrameAnalysis};
use crate::shared::draw::draw_rect;
use crate::shared::frame::Frame;

const BOX_COLOR: [u8; 3] = [0, 0, 255];
const BOX_THICKNESS: i32 = 2;

const MIN_FACE_SIZE: u32 = 20;
const SCORE_THRESHOLD: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const SLIDE_WINDOW_STEP: u32 = 4;

pub struct CascadeFaceDetector {
    model: Option<rustface::Model>,
}

impl CascadeFaceDetector {
    /// Load the SeetaFace cascade model from disk.
    pub fn new(model_path: &Path) -> Result<Self, DetectionError> {
        let file = File::open(model_path).map_err(|e| {
            DetectionError::Backend(format!(
                "cannot open cascade model {}: {e}",
                model_path.display()
            ))
        })?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| DetectionError::Backend(format!("cannot read cascade model: {e}")))?;
        Ok(Self { model: Some(model) })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn process(&mut self, frame: &Frame) -> Result<FrameAnalysis, DetectionError> {
        let model = self.model.as_ref().ok_or(DetectionError::Released)?;

        let gray = frame.to_grayscale();
        let mut detector = rustface::create_detector_with_model(model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let found = detector.detect(&rustface::ImageData::new(
            &gray,
            frame.width(),
            frame.height(),
        ));

        let mut annotated = frame.clone();
        let faces: Vec<FaceDetectionResult> = found
            .iter()
            .filter_map(|info| {
                let b = info.bbox();
                clamp_box(
                    b.x(),
                    b.y(),
                    b.width() as i32,
                    b.height() as i32,
                    frame.width(),
                    frame.height(),
                )
            })
            .map(|bbox| {
                draw_rect(
                    &mut annotated,
                    bbox.x,
                    bbox.y,
                    bbox.width,
                    bbox.height,
                    BOX_THICKNESS,
                    BOX_COLOR,
                );
                FaceDetectionResult {
                    bbox,
                    confidence: None,
                }
            })
            .collect();

        let batch = DetectionBatch::new(faces);
        log::debug!("cascade detector found {} face(s)", batch.count());

        Ok(FrameAnalysis { annotated, batch })
    }

    fn release(&mut self) {
        self.model = None;
    }
}

impl Drop for CascadeFaceDetector {
    fn drop(&mut self) {
        self.release();
    }
}

/// Clamp a raw cascade box to the frame. Boxes entirely outside the
/// frame, or degenerate after clamping, are dropped.
fn clamp_box(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    frame_width: u32,
    frame_height: u32,
) -> Option<BoundingBox> {
    let (fw, fh) = (frame_width as i32, frame_height as i32);
    let x1 = x.clamp(0, fw);
    let y1 = y.clamp(0, fh);
    let x2 = (x + width).clamp(0, fw);
    let y2 = (y + height).clamp(0, fh);
    if x2 - x1 <= 0 || y2 - y1 <= 0 {
        return None;
    }
    Some(BoundingBox {
        x: x1,
        y: y1,
        width: x2 - x1,
        height: y2 - y1,
    })
}
