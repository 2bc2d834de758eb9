// Romanian deadlift cascade
//
// Three angle systems are judged together: knee softness, back neutrality,
// and hinge depth, plus a bar-path proxy on the shoulder. The knee band
// runs on the lower body alone; the torso checks need a visible shoulder
// and sit out when there is none. Safety-severity faults displace form
// faults, which displace praise; the praise checks carry predicates so a
// single frame never stacks compliments.

use crate::config::DeadliftConfig;
use crate::feedback::FeedbackKey;
use crate::pose::{geometry, Pose};

use super::{core_joints, resolve, Check, Diagnostics, FormVerdict, Severity};

pub fn analyze(pose: &Pose, cfg: &DeadliftConfig) -> FormVerdict {
    let (hip, knee, ankle) = match core_joints(pose) {
        Some(joints) => joints,
        None => return FormVerdict::absent(),
    };
    let shoulder = pose.shoulder();

    let knee_angle = geometry::angle_at(hip, knee, ankle);
    let back_angle = shoulder.map(|s| geometry::angle_at(s, hip, knee));
    let hip_hinge_angle = shoulder.map(|s| geometry::angle_at(s, hip, ankle));

    let diag = Diagnostics {
        knee_angle: Some(knee_angle),
        back_angle,
        hip_hinge_angle,
        ..Diagnostics::default()
    };

    let mut checks: Vec<Check> = Vec::new();

    // Knee softness: the RDL wants a slight, fixed bend.
    if knee_angle < cfg.knee_too_bent_below {
        checks.push(Check::new(
            Severity::Form,
            FeedbackKey::DeadliftKneeTooBent,
            false,
        ));
    } else if knee_angle > cfg.knee_too_straight_above {
        checks.push(Check::new(
            Severity::Form,
            FeedbackKey::DeadliftKneeTooStraight,
            false,
        ));
    } else if knee_angle >= cfg.good_knee_low && knee_angle <= cfg.good_knee_high {
        checks.push(Check::new(
            Severity::Encouragement,
            FeedbackKey::DeadliftGoodKnee,
            true,
        ));
    }

    // Back neutrality along the shoulder-hip-knee line.
    if let Some(back_angle) = back_angle {
        if back_angle < cfg.back_rounding_below {
            checks.push(Check::new(
                Severity::Safety,
                FeedbackKey::DeadliftBackRounding,
                false,
            ));
        } else if back_angle < cfg.back_neutral_above {
            // Slightly soft back: worth mentioning unless the frame already
            // earned knee praise, which means the position is close enough.
            let knee_praised = matches!(
                resolve(&checks).map(|c| &c.key),
                Some(FeedbackKey::DeadliftGoodKnee)
            );
            if !knee_praised {
                checks.push(Check::new(
                    Severity::Form,
                    FeedbackKey::DeadliftBackStraighten,
                    false,
                ));
            }
        } else {
            checks.push(Check::new(
                Severity::Encouragement,
                FeedbackKey::DeadliftBackExcellent,
                true,
            ));
        }
    }

    // Hinge depth along the shoulder-hip-ankle line.
    if let Some(hip_hinge_angle) = hip_hinge_angle {
        if hip_hinge_angle > cfg.hinge_upright_above {
            checks.push(Check::new(
                Severity::Form,
                FeedbackKey::DeadliftHingeMore,
                false,
            ));
        } else if hip_hinge_angle < cfg.hinge_deep_below {
            checks.push(Check::new(
                Severity::Form,
                FeedbackKey::DeadliftVeryDeep,
                false,
            ));
        } else if hip_hinge_angle >= cfg.good_hinge_low && hip_hinge_angle <= cfg.good_hinge_high {
            let already_praised = matches!(
                resolve(&checks).map(|c| &c.key),
                Some(FeedbackKey::DeadliftBackExcellent) | Some(FeedbackKey::DeadliftGoodKnee)
            );
            if !already_praised {
                checks.push(Check::new(
                    Severity::Encouragement,
                    FeedbackKey::DeadliftGoodHinge,
                    true,
                ));
            }
        }
    }

    // Shoulders drifting ahead of the hips pulls the bar off the body.
    if let Some(shoulder) = shoulder {
        if shoulder.x > hip.x + cfg.shoulder_forward_px {
            checks.push(Check::new(
                Severity::Safety,
                FeedbackKey::DeadliftShoulderPosition,
                false,
            ));
        }
    }

    match resolve(&checks) {
        Some(winner) => FormVerdict::keyed(winner.key.clone(), winner.is_valid, diag),
        None => FormVerdict::quiet(diag),
    }
}
