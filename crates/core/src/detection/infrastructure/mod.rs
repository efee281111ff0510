pub mod cascade_detector;
pub mod detector_factory;
pub mod mesh_detector;
pub mod model_resolver;
pub mod onnx_facemesh_estimator;
