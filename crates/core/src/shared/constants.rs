pub const FACE_MESH_MODEL_NAME: &str = "face_mesh_192.onnx";
pub const FACE_MESH_MODEL_URL: &str =
    "https://github.com/facemark-app/facemark/releases/download/v0.1.0/face_mesh_192.onnx";

pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const CASCADE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Cap on faces tracked simultaneously by the landmark detector.
pub const DEFAULT_MAX_FACES: usize = 10;

pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f64 = 0.5;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
