// Push-up cascade
//
// Elbow angle drives the depth bands; the alignment checks are evaluated
// afterwards at safety severity so a straightness, hand, or flare fault
// displaces depth commentary.

use crate::config::PushUpConfig;
use crate::feedback::FeedbackKey;
use crate::pose::{geometry, Pose};

use super::{core_joints, resolve, Check, Diagnostics, FormVerdict, Severity};

pub fn analyze(pose: &Pose, cfg: &PushUpConfig) -> FormVerdict {
    let (hip, _knee, ankle) = match core_joints(pose) {
        Some(joints) => joints,
        None => return FormVerdict::absent(),
    };
    let (shoulder, elbow, wrist) = match (pose.shoulder(), pose.elbow(), pose.wrist()) {
        (Some(s), Some(e), Some(w)) => (s, e, w),
        _ => return FormVerdict::absent(),
    };

    let elbow_angle = geometry::angle_at(shoulder, elbow, wrist);
    let body_line_angle = geometry::angle_at(shoulder, hip, ankle);

    let diag = Diagnostics {
        elbow_angle: Some(elbow_angle),
        body_line_angle: Some(body_line_angle),
        ..Diagnostics::default()
    };

    // Depth bands. Top of the rep is ~180, bottom ~90.
    let depth = if elbow_angle > cfg.too_shallow_elbow_above {
        Check::new(Severity::Form, FeedbackKey::PushUpTooShallow, false)
    } else if elbow_angle < cfg.excellent_depth_elbow_below {
        Check::new(Severity::Encouragement, FeedbackKey::PushUpExcellentDepth, true)
    } else if elbow_angle < cfg.good_depth_elbow_below {
        Check::new(Severity::Encouragement, FeedbackKey::PushUpGoodDepth, true)
    } else if elbow_angle < cfg.deeper_elbow_below {
        Check::new(Severity::Encouragement, FeedbackKey::PushUpNeedDeeper, true)
    } else {
        Check::new(Severity::Form, FeedbackKey::PushUpTooShallowAlt, false)
    };

    let mut checks = vec![depth];

    // Sagging or piking breaks the shoulder-hip-ankle line.
    if body_line_angle < cfg.body_line_below {
        checks.push(Check::new(
            Severity::Safety,
            FeedbackKey::PushUpBodyAlignment,
            false,
        ));
    }

    // Wrists trailing the shoulders means the user is leaning forward.
    if wrist.x < shoulder.x - cfg.hand_offset_px {
        checks.push(Check::new(
            Severity::Safety,
            FeedbackKey::PushUpHandPosition,
            false,
        ));
    }

    // Elbow flare: horizontal over vertical shoulder-elbow offset.
    let horizontal = (elbow.x - shoulder.x).abs();
    let vertical = {
        let v = (elbow.y - shoulder.y).abs();
        if v == 0.0 {
            1.0
        } else {
            v
        }
    };
    if horizontal / vertical > cfg.elbow_flare_ratio_above {
        checks.push(Check::new(
            Severity::Safety,
            FeedbackKey::PushUpElbowFlare,
            false,
        ));
    }

    match resolve(&checks) {
        Some(winner) => FormVerdict::keyed(winner.key.clone(), winner.is_valid, diag),
        None => FormVerdict::quiet(diag),
    }
}
