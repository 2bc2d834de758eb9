//! Synthetic pose fixtures and the scripted pose provider.
//!
//! Each named fixture is a keypoint layout whose angles land squarely in
//! one analyzer band. Scripts sequence fixtures into frame-by-frame
//! playback for integration tests and the CLI, standing in for a live
//! pose model.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::engine::PoseProvider;
use crate::error::{FixtureError, SessionError};
use crate::pose::{Joint, Keypoint, Pose};

fn kp(joint: Joint, x: f32, y: f32) -> Keypoint {
    Keypoint::new(joint, x, y, 0.9)
}

/// Named fixture catalog, keyed by the identifiers scripts refer to.
pub static CATALOG: Lazy<BTreeMap<&'static str, Pose>> = Lazy::new(|| {
    let mut catalog = BTreeMap::new();

    // Vertical torso over an 80 degree knee bend.
    catalog.insert(
        "squat-good-depth",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 100.0, 100.0),
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 100.0, 300.0),
            kp(Joint::LeftAnkle, 198.5, 282.6),
        ]),
    );

    // Standing tall with locked knees; shoulder out of frame.
    catalog.insert(
        "squat-locked-knees",
        Pose::new(vec![
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 100.0, 300.0),
            kp(Joint::LeftAnkle, 101.0, 400.0),
        ]),
    );

    // Folded forward on straight legs.
    catalog.insert(
        "squat-bent-over",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 186.6, 150.0),
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 100.0, 300.0),
            kp(Joint::LeftAnkle, 134.2, 394.0),
        ]),
    );

    // Deep elbow bend with a straight body line.
    catalog.insert(
        "pushup-excellent",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 100.0, 100.0),
            kp(Joint::LeftElbow, 100.0, 160.0),
            kp(Joint::LeftWrist, 147.0, 142.9),
            kp(Joint::LeftHip, 200.0, 110.0),
            kp(Joint::LeftKnee, 250.0, 115.0),
            kp(Joint::LeftAnkle, 300.0, 120.0),
        ]),
    );

    // Same arm position with the hips sagging out of line.
    catalog.insert(
        "pushup-sagging",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 100.0, 100.0),
            kp(Joint::LeftElbow, 100.0, 160.0),
            kp(Joint::LeftWrist, 147.0, 142.9),
            kp(Joint::LeftHip, 200.0, 160.0),
            kp(Joint::LeftKnee, 250.0, 115.0),
            kp(Joint::LeftAnkle, 300.0, 120.0),
        ]),
    );

    // Thigh horizontal, shin vertical: the 90 degree hold. Arms are in
    // frame but the shoulder is not, so the strict back check stays out
    // of the way.
    catalog.insert(
        "wallsit-perfect",
        Pose::new(vec![
            kp(Joint::LeftElbow, 100.0, 150.0),
            kp(Joint::LeftWrist, 100.0, 190.0),
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 200.0, 200.0),
            kp(Joint::LeftAnkle, 200.0, 300.0),
        ]),
    );

    // Hips sunk well below the knees with an overbent knee.
    catalog.insert(
        "wallsit-hips-low",
        Pose::new(vec![
            kp(Joint::LeftKnee, 100.0, 200.0),
            kp(Joint::LeftHip, 100.0, 270.0),
            kp(Joint::LeftAnkle, 194.0, 234.2),
        ]),
    );

    // Soft knees, neutral back, solid hinge.
    catalog.insert(
        "rdl-neutral",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 117.4, 101.5),
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 100.0, 300.0),
            kp(Joint::LeftAnkle, 134.2, 394.0),
        ]),
    );

    // Rounded back in an otherwise good hinge.
    catalog.insert(
        "rdl-rounded",
        Pose::new(vec![
            kp(Joint::LeftShoulder, 125.7, 169.4),
            kp(Joint::LeftHip, 100.0, 200.0),
            kp(Joint::LeftKnee, 100.0, 300.0),
            kp(Joint::LeftAnkle, 134.2, 394.0),
        ]),
    );

    // Head and arms only: enough keypoints to count as a detection,
    // never enough to pass the visibility gate.
    catalog.insert(
        "upper-body-only",
        Pose::new(vec![
            kp(Joint::Nose, 100.0, 50.0),
            kp(Joint::LeftShoulder, 100.0, 100.0),
            kp(Joint::LeftElbow, 100.0, 160.0),
            kp(Joint::LeftWrist, 120.0, 210.0),
        ]),
    );

    catalog
});

/// Look up a fixture pose by name.
pub fn pose(name: &str) -> Result<Pose, FixtureError> {
    CATALOG
        .get(name)
        .cloned()
        .ok_or_else(|| FixtureError::NotFound {
            name: name.to_string(),
        })
}

/// Names of every fixture in the catalog, sorted.
pub fn fixture_names() -> Vec<&'static str> {
    CATALOG.keys().copied().collect()
}

/// One step of a playback script: a fixture name (or no detection at
/// all), held for `repeat` frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptFrame {
    /// Fixture name, or `None` for a frame with no person detected.
    pub pose: Option<String>,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

/// A frame-by-frame pose sequence loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseScript {
    pub frames: Vec<ScriptFrame>,
}

impl PoseScript {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| FixtureError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// Expand repeats into the literal per-frame sequence, resolving
    /// fixture names against the catalog.
    pub fn expand(&self) -> Result<Vec<Option<Pose>>, FixtureError> {
        let mut frames = Vec::new();
        for frame in &self.frames {
            let resolved = match &frame.pose {
                Some(name) => Some(pose(name)?),
                None => None,
            };
            for _ in 0..frame.repeat.max(1) {
                frames.push(resolved.clone());
            }
        }
        Ok(frames)
    }
}

/// Pose provider that plays back a fixed frame sequence.
///
/// Once the script runs out, the final frame repeats forever, which
/// keeps a session alive for as long as a test needs it.
pub struct ScriptedPoseProvider {
    frames: Mutex<VecDeque<Option<Pose>>>,
    last: Mutex<Option<Pose>>,
}

impl ScriptedPoseProvider {
    pub fn new(frames: Vec<Option<Pose>>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            last: Mutex::new(None),
        }
    }

    pub fn from_script(script: &PoseScript) -> Result<Self, FixtureError> {
        Ok(Self::new(script.expand()?))
    }

    /// Frames not yet played.
    pub fn remaining(&self) -> usize {
        self.frames.lock().map(|f| f.len()).unwrap_or(0)
    }
}

impl PoseProvider for ScriptedPoseProvider {
    fn detect(&self) -> BoxFuture<'_, Result<Option<Pose>, SessionError>> {
        Box::pin(async {
            let next = match self.frames.lock() {
                Ok(mut frames) => frames.pop_front(),
                Err(_) => {
                    return Err(SessionError::PoseProviderFailed {
                        reason: "script lock poisoned".to_string(),
                    })
                }
            };
            match next {
                Some(frame) => {
                    if let Ok(mut last) = self.last.lock() {
                        *last = frame.clone();
                    }
                    Ok(frame)
                }
                None => Ok(self.last.lock().map(|l| l.clone()).unwrap_or(None)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, Exercise};
    use crate::config::AppConfig;
    use crate::feedback::FeedbackKey;
    use crate::pose::is_fully_visible;

    #[test]
    fn catalog_fixtures_classify_as_named() {
        let config = AppConfig::default();
        let cases = [
            ("squat-good-depth", Exercise::Squat, FeedbackKey::SquatGoodDepth),
            (
                "squat-locked-knees",
                Exercise::Squat,
                FeedbackKey::SquatKneeTooStraight,
            ),
            ("squat-bent-over", Exercise::Squat, FeedbackKey::SquatBentOver),
            (
                "pushup-excellent",
                Exercise::PushUp,
                FeedbackKey::PushUpExcellentDepth,
            ),
            (
                "pushup-sagging",
                Exercise::PushUp,
                FeedbackKey::PushUpBodyAlignment,
            ),
            (
                "wallsit-hips-low",
                Exercise::WallSit,
                FeedbackKey::WallSitHipsTooLow,
            ),
            (
                "rdl-neutral",
                Exercise::RomanianDeadlift,
                FeedbackKey::DeadliftBackExcellent,
            ),
            (
                "rdl-rounded",
                Exercise::RomanianDeadlift,
                FeedbackKey::DeadliftBackRounding,
            ),
        ];
        for (name, exercise, expected) in cases {
            let fixture = pose(name).unwrap();
            let verdict = analyze(exercise, &fixture, &config);
            assert_eq!(verdict.key, Some(expected), "fixture {}", name);
        }
    }

    #[test]
    fn wallsit_perfect_passes_the_visibility_gate() {
        let fixture = pose("wallsit-perfect").unwrap();
        assert!(is_fully_visible(&fixture, Exercise::WallSit));
        let verdict = analyze(Exercise::WallSit, &fixture, &AppConfig::default());
        assert_eq!(verdict.key, Some(FeedbackKey::WallSitPerfectKnee));
    }

    #[test]
    fn upper_body_fixture_fails_squat_visibility() {
        let fixture = pose("upper-body-only").unwrap();
        assert!(!is_fully_visible(&fixture, Exercise::Squat));
    }

    #[test]
    fn unknown_fixture_name_is_an_error() {
        let err = pose("does-not-exist").unwrap_err();
        assert!(matches!(err, FixtureError::NotFound { .. }));
    }

    #[test]
    fn scripts_expand_repeats_in_order() {
        let script = PoseScript {
            frames: vec![
                ScriptFrame {
                    pose: None,
                    repeat: 2,
                },
                ScriptFrame {
                    pose: Some("squat-good-depth".to_string()),
                    repeat: 3,
                },
            ],
        };
        let expanded = script.expand().unwrap();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].is_none());
        assert!(expanded[1].is_none());
        assert!(expanded[2].is_some());
        assert!(expanded[4].is_some());
    }

    #[tokio::test]
    async fn scripted_provider_holds_the_final_frame() {
        let fixture = pose("squat-good-depth").unwrap();
        let provider = ScriptedPoseProvider::new(vec![None, Some(fixture.clone())]);

        assert_eq!(provider.detect().await.unwrap(), None);
        assert_eq!(provider.detect().await.unwrap(), Some(fixture.clone()));
        // Exhausted: the last frame repeats.
        assert_eq!(provider.detect().await.unwrap(), Some(fixture));
        assert_eq!(provider.remaining(), 0);
    }
}
