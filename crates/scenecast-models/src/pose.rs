//! Pose labels used for avatar creation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of posed photos the vendor needs to build an avatar.
pub const MIN_POSED_PHOTOS: usize = 3;

/// Pose assigned to each uploaded photo, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PoseLabel {
    Front,
    Left,
    Right,
    FrontFull,
    LeftFull,
    RightFull,
}

impl PoseLabel {
    /// Poses in the order photos are assigned to them.
    pub const ORDERED: &'static [PoseLabel] = &[
        PoseLabel::Front,
        PoseLabel::Left,
        PoseLabel::Right,
        PoseLabel::FrontFull,
        PoseLabel::LeftFull,
        PoseLabel::RightFull,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoseLabel::Front => "front",
            PoseLabel::Left => "left",
            PoseLabel::Right => "right",
            PoseLabel::FrontFull => "front_full",
            PoseLabel::LeftFull => "left_full",
            PoseLabel::RightFull => "right_full",
        }
    }
}

impl fmt::Display for PoseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pair photos with pose labels in order. Photos past the sixth are dropped.
pub fn map_poses<T>(photos: &[T]) -> Vec<(PoseLabel, &T)> {
    PoseLabel::ORDERED.iter().copied().zip(photos.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_poses_ignores_extra_photos() {
        let photos: Vec<u8> = (1..=9).collect();
        let mapped = map_poses(&photos);

        assert_eq!(mapped.len(), 6);
        let labels: Vec<_> = mapped.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            labels,
            vec!["front", "left", "right", "front_full", "left_full", "right_full"]
        );
        let values: Vec<_> = mapped.iter().map(|(_, v)| **v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_map_poses_short_list() {
        let photos = ["a", "b"];
        let mapped = map_poses(&photos);
        assert_eq!(mapped.len(), 2);
        assert!(mapped.len() < MIN_POSED_PHOTOS);
    }

    #[test]
    fn test_pose_serializes_snake_case() {
        let json = serde_json::to_string(&PoseLabel::FrontFull).unwrap();
        assert_eq!(json, "\"front_full\"");
    }
}
