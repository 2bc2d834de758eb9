// Squat cascade
//
// Strict priority order with early returns: the torso fault patterns are
// safety checks and short-circuit the depth bands. Order is load-bearing;
// later checks assume the earlier ones did not trigger.

use crate::config::SquatConfig;
use crate::feedback::FeedbackKey;
use crate::pose::{geometry, Pose};

use super::{core_joints, Diagnostics, FormVerdict};

pub fn analyze(pose: &Pose, cfg: &SquatConfig) -> FormVerdict {
    let (hip, knee, ankle) = match core_joints(pose) {
        Some(joints) => joints,
        None => return FormVerdict::absent(),
    };
    let shoulder = pose.shoulder();

    let knee_angle = geometry::angle_at(hip, knee, ankle);
    let hip_angle = shoulder.map(|s| geometry::angle_at(s, hip, knee));

    let mut diag = Diagnostics {
        knee_angle: Some(knee_angle),
        hip_angle,
        ..Diagnostics::default()
    };

    if let Some(hip_angle) = hip_angle {
        // Folding forward without bending the knees.
        if hip_angle < cfg.bent_over_hip_below && knee_angle > cfg.bent_over_knee_above {
            return FormVerdict::keyed(FeedbackKey::SquatBentOver, false, diag);
        }

        // Severe back rounding outranks everything below.
        if hip_angle < cfg.back_rounding_hip_below {
            return FormVerdict::keyed(FeedbackKey::SquatBackAlignment, false, diag);
        }
    }

    if let Some(shoulder) = shoulder {
        let lean = geometry::lean_from_vertical(shoulder, hip);
        diag.torso_lean = Some(lean);

        // Bowing: torso pitched forward while the knees stay straight.
        // Two threshold pairings catch different bow shapes.
        let bowing = lean > cfg.bow_lean_above && knee_angle > cfg.bow_knee_above;
        let bowing_straight_knees =
            lean > cfg.bow_slight_lean_above && knee_angle > cfg.bow_straight_knee_above;
        if bowing || bowing_straight_knees {
            return FormVerdict::keyed(FeedbackKey::SquatSitBack, false, diag);
        }

        // Nearly horizontal torso while actually squatting: hinging at the
        // hips instead of sitting back.
        if lean > cfg.upright_lean_above && knee_angle < cfg.upright_knee_below {
            return FormVerdict::keyed(FeedbackKey::SquatUprightChair, false, diag);
        }

        // Good-morning pattern: upper body travels forward or down while
        // the legs stay straight.
        let hip_drop = hip.y - shoulder.y;
        let leaning = lean > cfg.good_morning_lean_above && knee_angle > cfg.good_morning_knee_above;
        let dropping =
            hip_drop > cfg.good_morning_hip_drop_px && knee_angle > cfg.good_morning_knee_above;
        let slight_lean = lean > cfg.good_morning_slight_lean_above
            && knee_angle > cfg.good_morning_straight_knee_above;
        if leaning || dropping || slight_lean {
            return FormVerdict::keyed(FeedbackKey::SquatSitBack, false, diag);
        }
    }

    // Depth bands on the knee angle. 140 up to the no-bend cutoff is
    // acceptable and stays silent.
    let depth = if knee_angle > cfg.no_bend_knee_above {
        Some((FeedbackKey::SquatKneeTooStraight, false))
    } else if knee_angle < cfg.great_depth_knee_below {
        Some((FeedbackKey::SquatGreatDepth, true))
    } else if knee_angle < cfg.good_depth_knee_below {
        Some((FeedbackKey::SquatGoodDepth, true))
    } else if knee_angle < cfg.encourage_knee_below {
        Some((FeedbackKey::SquatEncouragement, true))
    } else {
        None
    };

    if let Some((key, is_valid)) = depth {
        return FormVerdict::keyed(key, is_valid, diag);
    }

    // Knee-over-ankle alignment, only consulted when the depth bands had
    // nothing to say.
    let knee_ankle_offset = (knee.x - ankle.x).abs();
    let hip_knee_length = {
        let d = geometry::distance(hip, knee);
        if d == 0.0 {
            1.0
        } else {
            d
        }
    };
    if knee_ankle_offset / hip_knee_length > cfg.knee_alignment_ratio_above {
        return FormVerdict::keyed(FeedbackKey::SquatKneeAlignment, false, diag);
    }

    FormVerdict::quiet(diag)
}
