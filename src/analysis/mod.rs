// Analysis module - per-exercise form classification
//
// One analyzer per exercise. Each consumes a pose and produces a
// FormVerdict through an ordered rule cascade. The squat cascade
// short-circuits; the others collect explicit severity-tagged checks and
// resolve them with higher-severity-wins, later-wins-on-ties, which
// preserves the hand-tuned override order while keeping it auditable.

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::feedback::FeedbackKey;
use crate::pose::{Keypoint, Pose};

pub mod deadlift;
pub mod pushup;
pub mod squat;
pub mod wallsit;


/// The fixed exercise vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exercise {
    Squat,
    PushUp,
    WallSit,
    RomanianDeadlift,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::Squat,
        Exercise::PushUp,
        Exercise::WallSit,
        Exercise::RomanianDeadlift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
            Exercise::PushUp => "push-up",
            Exercise::WallSit => "wall-sit",
            Exercise::RomanianDeadlift => "romanian-deadlift",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "squat" => Some(Exercise::Squat),
            "push-up" | "pushup" => Some(Exercise::PushUp),
            "wall-sit" | "wallsit" => Some(Exercise::WallSit),
            "romanian-deadlift" | "rdl" => Some(Exercise::RomanianDeadlift),
            _ => None,
        }
    }

    /// Static holds get idle encouragement instead of rep commentary.
    pub fn is_static_hold(&self) -> bool {
        matches!(self, Exercise::WallSit)
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Angles measured while analyzing a frame, for display and diagnostics.
/// Never an input to the decision logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knee_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elbow_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip_hinge_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_line_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torso_lean: Option<f32>,
}

/// One frame's form classification. Produced fresh every analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormVerdict {
    /// Canonical key for the feedback class, if any text was produced.
    pub key: Option<FeedbackKey>,
    /// Canonical phrasing; empty means silence.
    pub text: String,
    pub is_valid: bool,
    pub diagnostics: Diagnostics,
}

impl FormVerdict {
    /// Required joints missing: silence, not an error.
    pub fn absent() -> Self {
        Self {
            key: None,
            text: String::new(),
            is_valid: false,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Form acceptable, nothing worth saying.
    pub fn quiet(diagnostics: Diagnostics) -> Self {
        Self {
            key: None,
            text: String::new(),
            is_valid: true,
            diagnostics,
        }
    }

    pub fn keyed(key: FeedbackKey, is_valid: bool, diagnostics: Diagnostics) -> Self {
        let text = key.canonical_text().to_string();
        Self {
            key: Some(key),
            text,
            is_valid,
            diagnostics,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.text.is_empty()
    }
}

/// How much a triggered check matters when several are true at once.
///
/// Ordered: safety faults outrank form faults outrank encouragement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Severity {
    Encouragement,
    Form,
    Safety,
}

/// A triggered cascade rule awaiting resolution.
#[derive(Debug, Clone)]
pub(crate) struct Check {
    pub severity: Severity,
    pub key: FeedbackKey,
    pub is_valid: bool,
}

impl Check {
    pub fn new(severity: Severity, key: FeedbackKey, is_valid: bool) -> Self {
        Self {
            severity,
            key,
            is_valid,
        }
    }
}

/// Pick the winning check: highest severity, later entry on ties.
///
/// Later-wins on equal severity preserves the cascade's evaluation order
/// for checks the domain experts tuned as overrides.
pub(crate) fn resolve(checks: &[Check]) -> Option<&Check> {
    let mut winner: Option<&Check> = None;
    for check in checks {
        match winner {
            Some(current) if check.severity < current.severity => {}
            _ => winner = Some(check),
        }
    }
    winner
}

/// Hip, knee, and ankle are required by every analyzer; a frame without
/// them yields silence.
pub(crate) fn core_joints(pose: &Pose) -> Option<(&Keypoint, &Keypoint, &Keypoint)> {
    Some((pose.hip()?, pose.knee()?, pose.ankle()?))
}

/// Dispatch table over the exercise vocabulary.
pub fn analyze(exercise: Exercise, pose: &Pose, config: &AppConfig) -> FormVerdict {
    match exercise {
        Exercise::Squat => squat::analyze(pose, &config.squat),
        Exercise::PushUp => pushup::analyze(pose, &config.push_up),
        Exercise::WallSit => wallsit::analyze(pose, &config.wall_sit),
        Exercise::RomanianDeadlift => deadlift::analyze(pose, &config.deadlift),
    }
}
