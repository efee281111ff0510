use std::path::Path;

use thiserror::Error;

use crate::detection::domain::detection_result::DetectionBatch;
use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::imaging::domain::image_reader::{DecodeError, ImageReader};
use crate::imaging::domain::image_writer::{EncodeError, ImageWriter};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Single-image analysis pipeline: read → detect/score → optionally
/// write the annotated frame.
///
/// Owns the detector for its lifetime; `release()` is the orderly
/// teardown entry point, after which `execute()` fails. A decode failure
/// is per-call: it leaves the detector usable for the next call.
pub struct AnalyzeImageUseCase {
    reader: Box<dyn ImageReader>,
    detector: Box<dyn FaceDetector>,
    writer: Box<dyn ImageWriter>,
}

impl AnalyzeImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        detector: Box<dyn FaceDetector>,
        writer: Box<dyn ImageWriter>,
    ) -> Self {
        Self {
            reader,
            detector,
            writer,
        }
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        annotated_path: Option<&Path>,
    ) -> Result<DetectionBatch, PipelineError> {
        let frame = self.reader.read(input_path)?;
        let analysis = self.detector.process(&frame)?;

        if let Some(path) = annotated_path {
            self.writer.write(&analysis.annotated, path)?;
        }

        Ok(analysis.batch)
    }

    pub fn release(&mut self) {
        self.detector.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection_result::{BoundingBox, FaceDetectionResult};
    use crate::detection::domain::face_detector::FrameAnalysis;
    use crate::shared::frame::Frame;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        frame: Frame,
    }

    impl ImageReader for StubReader {
        fn read(&self, _path: &Path) -> Result<Frame, DecodeError> {
            Ok(self.frame.clone())
        }

        fn decode(&self, _bytes: &[u8]) -> Result<Frame, DecodeError> {
            Ok(self.frame.clone())
        }
    }

    struct FailingReader;

    impl ImageReader for FailingReader {
        fn read(&self, _path: &Path) -> Result<Frame, DecodeError> {
            Err(DecodeError::Malformed("truncated".into()))
        }

        fn decode(&self, _bytes: &[u8]) -> Result<Frame, DecodeError> {
            Err(DecodeError::Malformed("truncated".into()))
        }
    }

    struct StubDetector {
        faces: Vec<FaceDetectionResult>,
        released: bool,
    }

    impl StubDetector {
        fn new(faces: Vec<FaceDetectionResult>) -> Self {
            Self {
                faces,
                released: false,
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn process(&mut self, frame: &Frame) -> Result<FrameAnalysis, DetectionError> {
            if self.released {
                return Err(DetectionError::Released);
            }
            Ok(FrameAnalysis {
                annotated: frame.clone(),
                batch: DetectionBatch::new(self.faces.clone()),
            })
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    struct StubWriter {
        written: Arc<Mutex<Vec<std::path::PathBuf>>>,
    }

    impl StubWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubWriter {
        fn write(&self, _frame: &Frame, path: &Path) -> Result<(), EncodeError> {
            self.written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    // --- Helpers ---

    fn make_frame() -> Frame {
        Frame::new(vec![128u8; 100 * 100 * 3], 100, 100, 3)
    }

    fn face() -> FaceDetectionResult {
        FaceDetectionResult {
            bbox: BoundingBox {
                x: 10,
                y: 10,
                width: 30,
                height: 30,
            },
            confidence: None,
        }
    }

    // --- Tests ---

    #[test]
    fn test_returns_detector_batch() {
        let mut uc = AnalyzeImageUseCase::new(
            Box::new(StubReader { frame: make_frame() }),
            Box::new(StubDetector::new(vec![face(), face()])),
            Box::new(StubWriter::new()),
        );
        let batch = uc.execute(Path::new("in.png"), None).unwrap();
        assert_eq!(batch.count(), 2);
    }

    #[test]
    fn test_annotated_written_only_when_requested() {
        let writer = StubWriter::new();
        let written = writer.written.clone();
        let mut uc = AnalyzeImageUseCase::new(
            Box::new(StubReader { frame: make_frame() }),
            Box::new(StubDetector::new(vec![])),
            Box::new(writer),
        );

        uc.execute(Path::new("in.png"), None).unwrap();
        assert!(written.lock().unwrap().is_empty());

        uc.execute(Path::new("in.png"), Some(Path::new("out.png")))
            .unwrap();
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_failure_surfaces_as_decode_error() {
        let mut uc = AnalyzeImageUseCase::new(
            Box::new(FailingReader),
            Box::new(StubDetector::new(vec![face()])),
            Box::new(StubWriter::new()),
        );
        let err = uc.execute(Path::new("in.png"), None).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn test_execute_after_release_fails() {
        let mut uc = AnalyzeImageUseCase::new(
            Box::new(StubReader { frame: make_frame() }),
            Box::new(StubDetector::new(vec![])),
            Box::new(StubWriter::new()),
        );
        uc.release();
        let err = uc.execute(Path::new("in.png"), None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Detection(DetectionError::Released)
        ));
    }
}
