//! Fixed catalog mapping facial regions to face-mesh landmark indices.
//!
//! Indices refer to the 468-point mesh topology; index *i* is the same
//! anatomical point on every face and frame. Colors are RGB and only
//! affect annotated output, never scoring.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureRegion {
    Forehead,
    LeftEye,
    RightEye,
    Nose,
    Chin,
}

const FOREHEAD_INDICES: &[usize] = &[10, 151, 9, 8, 107, 106, 105, 66, 69, 104, 103, 67, 109, 108];

const LEFT_EYE_INDICES: &[usize] = &[
    33, 246, 161, 160, 159, 158, 157, 173, 133, 155, 154, 153, 145, 144, 163, 7,
];

const RIGHT_EYE_INDICES: &[usize] = &[
    362, 398, 384, 385, 386, 387, 388, 466, 263, 249, 390, 373, 374, 380, 381, 382,
];

const NOSE_INDICES: &[usize] = &[
    168, 6, 197, 195, 5, 4, 19, 94, 2, 164, 0, 11, 12, 13, 14, 15, 16, 17, 18, 200, 199, 175,
];

const CHIN_INDICES: &[usize] = &[152, 175, 199, 200, 18, 217, 122, 174, 194];

impl FeatureRegion {
    pub const ALL: [FeatureRegion; 5] = [
        FeatureRegion::Forehead,
        FeatureRegion::LeftEye,
        FeatureRegion::RightEye,
        FeatureRegion::Nose,
        FeatureRegion::Chin,
    ];

    pub fn landmark_indices(self) -> &'static [usize] {
        match self {
            FeatureRegion::Forehead => FOREHEAD_INDICES,
            FeatureRegion::LeftEye => LEFT_EYE_INDICES,
            FeatureRegion::RightEye => RIGHT_EYE_INDICES,
            FeatureRegion::Nose => NOSE_INDICES,
            FeatureRegion::Chin => CHIN_INDICES,
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            FeatureRegion::Forehead => [0, 255, 0],
            FeatureRegion::LeftEye | FeatureRegion::RightEye => [0, 0, 255],
            FeatureRegion::Nose => [255, 0, 0],
            FeatureRegion::Chin => [0, 255, 255],
        }
    }
}

/// Left and right eye indices concatenated: the eyes are scored as one
/// combined region.
pub fn combined_eye_indices() -> Vec<usize> {
    let mut indices = Vec::with_capacity(LEFT_EYE_INDICES.len() + RIGHT_EYE_INDICES.len());
    indices.extend_from_slice(LEFT_EYE_INDICES);
    indices.extend_from_slice(RIGHT_EYE_INDICES);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::landmarks::MESH_LANDMARK_COUNT;
    use rstest::rstest;

    #[rstest]
    #[case::forehead(FeatureRegion::Forehead, 14)]
    #[case::left_eye(FeatureRegion::LeftEye, 16)]
    #[case::right_eye(FeatureRegion::RightEye, 16)]
    #[case::nose(FeatureRegion::Nose, 22)]
    #[case::chin(FeatureRegion::Chin, 9)]
    fn test_index_table_sizes(#[case] region: FeatureRegion, #[case] expected: usize) {
        assert_eq!(region.landmark_indices().len(), expected);
    }

    #[test]
    fn test_all_indices_within_mesh_topology() {
        for region in FeatureRegion::ALL {
            for &idx in region.landmark_indices() {
                assert!(idx < MESH_LANDMARK_COUNT, "{region:?} index {idx} out of range");
            }
        }
    }

    #[test]
    fn test_no_region_is_empty() {
        for region in FeatureRegion::ALL {
            assert!(!region.landmark_indices().is_empty());
        }
    }

    #[test]
    fn test_eyes_share_a_color() {
        assert_eq!(
            FeatureRegion::LeftEye.color(),
            FeatureRegion::RightEye.color()
        );
    }

    #[test]
    fn test_combined_eye_indices_is_union_of_both_eyes() {
        let combined = combined_eye_indices();
        assert_eq!(combined.len(), 32);
        assert_eq!(&combined[..16], FeatureRegion::LeftEye.landmark_indices());
        assert_eq!(&combined[16..], FeatureRegion::RightEye.landmark_indices());
    }
}
