//! Keypoint trajectory types.
//!
//! The keypoint tracker emits one row per visible keypoint per frame. A
//! trajectory is the ordered path of a single keypoint.

use serde::{Deserialize, Serialize};

/// Video frame number.
pub type FrameNumber = i64;

/// One row of the keypoint tracker's output table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointRow {
    #[serde(rename = "Frame")]
    pub frame: FrameNumber,

    #[serde(rename = "Keypoint Index")]
    pub keypoint_index: u32,

    /// Horizontal image coordinate (pixels).
    #[serde(rename = "X")]
    pub x: f64,

    /// Vertical image coordinate (pixels, growing downwards).
    #[serde(rename = "Y")]
    pub y: f64,
}

/// A single sampled keypoint position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub frame: FrameNumber,
    pub x: f64,
    pub y: f64,
}

impl TrajectoryPoint {
    pub fn new(frame: FrameNumber, x: f64, y: f64) -> Self {
        Self { frame, x, y }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Ordered path of one keypoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    /// Build a trajectory from tracker rows, keeping only `keypoint_index`
    /// and ordering by frame.
    pub fn from_keypoints(rows: &[KeypointRow], keypoint_index: u32) -> Self {
        let mut points: Vec<TrajectoryPoint> = rows
            .iter()
            .filter(|r| r.keypoint_index == keypoint_index)
            .map(|r| TrajectoryPoint::new(r.frame, r.x, r.y))
            .collect();
        points.sort_by_key(|p| p.frame);
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Frame numbers in order.
    pub fn frames(&self) -> impl Iterator<Item = FrameNumber> + '_ {
        self.points.iter().map(|p| p.frame)
    }
}

impl From<Vec<(FrameNumber, f64, f64)>> for Trajectory {
    fn from(raw: Vec<(FrameNumber, f64, f64)>) -> Self {
        Self::new(
            raw.into_iter()
                .map(|(frame, x, y)| TrajectoryPoint::new(frame, x, y))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(frame: i64, keypoint_index: u32, x: f64, y: f64) -> KeypointRow {
        KeypointRow {
            frame,
            keypoint_index,
            x,
            y,
        }
    }

    #[test]
    fn test_from_keypoints_filters_and_sorts() {
        let rows = vec![
            row(2, 0, 2.0, 20.0),
            row(0, 1, 99.0, 99.0),
            row(0, 0, 0.0, 0.0),
            row(1, 0, 1.0, 10.0),
            row(1, 1, 98.0, 98.0),
        ];
        let trajectory = Trajectory::from_keypoints(&rows, 0);
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.frames().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(trajectory.points[1], TrajectoryPoint::new(1, 1.0, 10.0));
    }

    #[test]
    fn test_from_keypoints_unknown_index_is_empty() {
        let rows = vec![row(0, 0, 0.0, 0.0)];
        let trajectory = Trajectory::from_keypoints(&rows, 7);
        assert!(trajectory.is_empty());
    }

    #[test]
    fn test_finite_check() {
        assert!(TrajectoryPoint::new(0, 1.0, 2.0).is_finite());
        assert!(!TrajectoryPoint::new(0, f64::NAN, 2.0).is_finite());
        assert!(!TrajectoryPoint::new(0, 1.0, f64::INFINITY).is_finite());
    }
}
