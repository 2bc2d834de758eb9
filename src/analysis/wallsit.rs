// Wall-sit cascade
//
// The knee band always produces one check, valid or not. Back and hip
// position faults sit at safety severity and displace the knee
// commentary when they trigger.

use crate::config::WallSitConfig;
use crate::feedback::FeedbackKey;
use crate::pose::{geometry, Pose};

use super::{core_joints, resolve, Check, Diagnostics, FormVerdict, Severity};

pub fn analyze(pose: &Pose, cfg: &WallSitConfig) -> FormVerdict {
    let (hip, knee, ankle) = match core_joints(pose) {
        Some(joints) => joints,
        None => return FormVerdict::absent(),
    };
    let shoulder = pose.shoulder();

    let knee_angle = geometry::angle_at(hip, knee, ankle);
    let back_angle = shoulder.map(|s| geometry::angle_at(s, hip, knee));

    let diag = Diagnostics {
        knee_angle: Some(knee_angle),
        back_angle,
        ..Diagnostics::default()
    };

    // Target is a 90-degree hold; 85..=95 earns the perfect call.
    let knee_check = if knee_angle < cfg.knee_too_bent_below {
        Check::new(Severity::Form, FeedbackKey::WallSitKneeTooBent, false)
    } else if knee_angle > cfg.knee_too_straight_above {
        Check::new(Severity::Form, FeedbackKey::WallSitKneeTooStraight, false)
    } else if knee_angle >= cfg.perfect_knee_low && knee_angle <= cfg.perfect_knee_high {
        Check::new(Severity::Encouragement, FeedbackKey::WallSitPerfectKnee, true)
    } else {
        Check::new(Severity::Encouragement, FeedbackKey::WallSitGoodKnee, true)
    };

    let mut checks = vec![knee_check];

    if let Some(back_angle) = back_angle {
        // Back peeling off the wall.
        if back_angle < cfg.back_upright_below {
            checks.push(Check::new(
                Severity::Safety,
                FeedbackKey::WallSitBackAlignment,
                false,
            ));
        }
    }

    // Hip height relative to the knees. Screen y grows downward.
    let hip_drop = hip.y - knee.y;
    if hip_drop < cfg.hips_too_high_below_px {
        checks.push(Check::new(
            Severity::Safety,
            FeedbackKey::WallSitHipsTooHigh,
            false,
        ));
    } else if hip_drop > cfg.hips_too_low_above_px {
        // Only raised when the knee band itself is unhappy; a clean knee
        // angle at this depth is still an acceptable hold.
        let knee_is_happy = matches!(
            resolve(&checks).map(|c| &c.key),
            Some(FeedbackKey::WallSitPerfectKnee) | Some(FeedbackKey::WallSitGoodKnee)
        );
        if !knee_is_happy {
            checks.push(Check::new(
                Severity::Safety,
                FeedbackKey::WallSitHipsTooLow,
                false,
            ));
        }
    }

    match resolve(&checks) {
        Some(winner) => FormVerdict::keyed(winner.key.clone(), winner.is_valid, diag),
        None => FormVerdict::quiet(diag),
    }
}
