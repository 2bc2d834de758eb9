// Pose data model - keypoints, joint vocabulary, and side selection
//
// A frame's pose is a set of named 2D joint estimates with confidence
// scores. The joint vocabulary is closed (17 MoveNet joints); lookups go
// through an explicit prefer-left, fall-back-right policy instead of name
// matching so a new joint name can never silently hijack an angle.

use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod visibility;

pub use visibility::is_fully_visible;

/// Minimum confidence for a keypoint to participate in any decision.
pub const MIN_KEYPOINT_SCORE: f32 = 0.3;

/// The 17-joint vocabulary produced by the upstream pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const ALL: [Joint; 17] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];
}

/// A single 2D joint estimate in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub joint: Joint,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(joint: Joint, x: f32, y: f32, score: f32) -> Self {
        Self { joint, x, y, score }
    }

    /// Low-confidence keypoints are treated as absent everywhere.
    pub fn is_usable(&self) -> bool {
        self.score > MIN_KEYPOINT_SCORE
    }
}

/// One frame's worth of keypoints. Created per camera frame, discarded
/// after analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Look up a usable keypoint for an exact joint.
    pub fn joint(&self, joint: Joint) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|kp| kp.joint == joint && kp.is_usable())
    }

    /// Side-paired lookup: prefer the left joint, fall back to the right.
    pub fn preferred(&self, left: Joint, right: Joint) -> Option<&Keypoint> {
        self.joint(left).or_else(|| self.joint(right))
    }

    pub fn shoulder(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftShoulder, Joint::RightShoulder)
    }

    pub fn elbow(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftElbow, Joint::RightElbow)
    }

    pub fn wrist(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftWrist, Joint::RightWrist)
    }

    pub fn hip(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftHip, Joint::RightHip)
    }

    pub fn knee(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftKnee, Joint::RightKnee)
    }

    pub fn ankle(&self) -> Option<&Keypoint> {
        self.preferred(Joint::LeftAnkle, Joint::RightAnkle)
    }

    /// Number of keypoints confident enough to use this frame.
    pub fn usable_count(&self) -> usize {
        self.keypoints.iter().filter(|kp| kp.is_usable()).count()
    }
}
