// Angle and distance math on 2D keypoints
//
// All angles are interior (non-reflex) degrees in [0, 180]. Callers are
// responsible for confidence filtering; these functions only see points
// that already passed the usability gate.

use super::Keypoint;

/// Angle at `vertex` between the rays toward `a` and `c`, in degrees.
pub fn angle_at(a: &Keypoint, vertex: &Keypoint, c: &Keypoint) -> f32 {
    let rad = (c.y - vertex.y).atan2(c.x - vertex.x) - (a.y - vertex.y).atan2(a.x - vertex.x);
    let mut deg = rad.to_degrees().abs();
    if deg > 180.0 {
        deg = 360.0 - deg;
    }
    deg
}

/// Euclidean distance in pixel space.
pub fn distance(a: &Keypoint, b: &Keypoint) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Deviation of the upper-lower segment from vertical, in degrees.
///
/// 0 means perfectly upright, 90 means horizontal. Used for torso lean
/// checks where the sign of the lean does not matter.
pub fn lean_from_vertical(upper: &Keypoint, lower: &Keypoint) -> f32 {
    let dx = (upper.x - lower.x).abs();
    let dy = (upper.y - lower.y).abs();
    dx.atan2(dy).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Joint;

    fn pt(x: f32, y: f32) -> Keypoint {
        Keypoint::new(Joint::Nose, x, y, 1.0)
    }

    #[test]
    fn right_angle() {
        let angle = angle_at(&pt(0.0, -1.0), &pt(0.0, 0.0), &pt(1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn straight_line_is_180() {
        let angle = angle_at(&pt(-1.0, 0.0), &pt(0.0, 0.0), &pt(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn reflex_angles_fold_back() {
        // Rays at -90 and 135 degrees: raw difference is 225, interior is 135.
        let angle = angle_at(&pt(0.0, -1.0), &pt(0.0, 0.0), &pt(-1.0, 1.0));
        assert!((angle - 135.0).abs() < 1e-3);
    }

    #[test]
    fn zero_angle_for_coincident_rays() {
        let angle = angle_at(&pt(1.0, 1.0), &pt(0.0, 0.0), &pt(2.0, 2.0));
        assert!(angle.abs() < 1e-3);
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((distance(&pt(0.0, 0.0), &pt(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn vertical_segment_has_no_lean() {
        let lean = lean_from_vertical(&pt(10.0, 0.0), &pt(10.0, 100.0));
        assert!(lean.abs() < 1e-3);
    }

    #[test]
    fn forty_five_degree_lean() {
        let lean = lean_from_vertical(&pt(100.0, 0.0), &pt(0.0, 100.0));
        assert!((lean - 45.0).abs() < 1e-3);
    }
}
