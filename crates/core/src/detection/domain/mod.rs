pub mod confidence_filter;
pub mod detection_result;
pub mod face_aggregator;
pub mod face_detector;
pub mod feature_region;
pub mod landmark_estimator;
pub mod landmarks;
