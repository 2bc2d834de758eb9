// Full-body visibility gate
//
// Coarse completeness check run before any analyzer: does the frame show
// enough of the joints this exercise actually needs? A joint group counts
// as present when either side of the pair is usable.

use crate::analysis::Exercise;
use crate::pose::{Joint, Pose};

struct JointGroup {
    left: Joint,
    right: Joint,
}

impl JointGroup {
    const fn new(left: Joint, right: Joint) -> Self {
        Self { left, right }
    }

    fn present_in(&self, pose: &Pose) -> bool {
        pose.preferred(self.left, self.right).is_some()
    }
}

const LOWER_BODY_GROUPS: [JointGroup; 4] = [
    JointGroup::new(Joint::LeftShoulder, Joint::RightShoulder),
    JointGroup::new(Joint::LeftHip, Joint::RightHip),
    JointGroup::new(Joint::LeftKnee, Joint::RightKnee),
    JointGroup::new(Joint::LeftAnkle, Joint::RightAnkle),
];

const UPPER_BODY_GROUPS: [JointGroup; 3] = [
    JointGroup::new(Joint::LeftShoulder, Joint::RightShoulder),
    JointGroup::new(Joint::LeftElbow, Joint::RightElbow),
    JointGroup::new(Joint::LeftWrist, Joint::RightWrist),
];

/// Whether enough joints are visible to attempt analysis for `exercise`.
///
/// Squat and Romanian deadlift need 3 of the 4 lower-body groups; the
/// arm-driven exercises need 2 of the 3 upper-body groups.
pub fn is_fully_visible(pose: &Pose, exercise: Exercise) -> bool {
    let (groups, minimum): (&[JointGroup], usize) = match exercise {
        Exercise::Squat | Exercise::RomanianDeadlift => (&LOWER_BODY_GROUPS, 3),
        Exercise::PushUp | Exercise::WallSit => (&UPPER_BODY_GROUPS, 2),
    };

    let present = groups.iter().filter(|g| g.present_in(pose)).count();
    present >= minimum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn kp(joint: Joint, score: f32) -> Keypoint {
        Keypoint::new(joint, 100.0, 100.0, score)
    }

    #[test]
    fn squat_accepts_three_of_four_groups() {
        let pose = Pose::new(vec![
            kp(Joint::LeftShoulder, 0.9),
            kp(Joint::LeftHip, 0.9),
            kp(Joint::RightKnee, 0.9),
        ]);
        assert!(is_fully_visible(&pose, Exercise::Squat));
    }

    #[test]
    fn squat_rejects_two_groups() {
        let pose = Pose::new(vec![kp(Joint::LeftHip, 0.9), kp(Joint::LeftKnee, 0.9)]);
        assert!(!is_fully_visible(&pose, Exercise::Squat));
    }

    #[test]
    fn low_confidence_joint_does_not_count() {
        let pose = Pose::new(vec![
            kp(Joint::LeftShoulder, 0.9),
            kp(Joint::LeftHip, 0.9),
            kp(Joint::LeftKnee, 0.1),
            kp(Joint::RightKnee, 0.2),
        ]);
        assert!(!is_fully_visible(&pose, Exercise::Squat));
    }

    #[test]
    fn pushup_needs_two_of_three_arm_groups() {
        let pose = Pose::new(vec![kp(Joint::RightShoulder, 0.9), kp(Joint::RightWrist, 0.9)]);
        assert!(is_fully_visible(&pose, Exercise::PushUp));

        let pose = Pose::new(vec![kp(Joint::RightShoulder, 0.9)]);
        assert!(!is_fully_visible(&pose, Exercise::PushUp));
    }

    #[test]
    fn deadlift_uses_lower_body_groups() {
        let pose = Pose::new(vec![
            kp(Joint::LeftHip, 0.9),
            kp(Joint::LeftKnee, 0.9),
            kp(Joint::LeftAnkle, 0.9),
        ]);
        assert!(is_fully_visible(&pose, Exercise::RomanianDeadlift));
    }
}
