//! Angle helpers.
//!
//! All functions work in radians. Euler angles follow the roll-pitch-yaw
//! convention `R = Rz(yaw) * Ry(pitch) * Rx(roll)` (extrinsic X, Y, Z),
//! the same one used by tf2's `getRPY`.

use std::f64::consts::PI;

use nalgebra::UnitQuaternion;

const TWO_PI: f64 = 2.0 * PI;

/// Normalizes `angle` into `[-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TWO_PI);
    if a > PI {
        a - TWO_PI
    } else {
        a
    }
}

/// Returns the signed shortest rotation that takes `from` to `to`, in `[-π, π]`.
pub fn shortest_angular_distance(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Extracts `(roll, pitch, yaw)` from `orientation`.
pub fn roll_pitch_yaw(orientation: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    orientation.euler_angles()
}

/// Builds the orientation described by `roll`, `pitch` and `yaw`.
pub fn from_roll_pitch_yaw(roll: f64, pitch: f64, yaw: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(roll, pitch, yaw)
}

/// Angle of the rotation between `a` and `b`, `2 * acos(|a . b|)`, in `[0, π]`.
///
/// `q` and `-q` describe the same orientation, hence the absolute value.
pub fn quaternion_angular_distance(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    let dot = a.coords.dot(&b.coords).abs().min(1.0);
    2.0 * dot.acos()
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert_approx_eq!(normalize_angle(0.0), 0.0);
        assert_approx_eq!(normalize_angle(PI / 2.0), PI / 2.0);
        assert_approx_eq!(normalize_angle(-PI / 2.0), -PI / 2.0);
        assert_approx_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0);
        assert_approx_eq!(normalize_angle(-3.0 * PI / 2.0), PI / 2.0);
        assert_approx_eq!(normalize_angle(5.0 * PI + 0.1), -PI + 0.1);
        assert!(normalize_angle(PI).abs() <= PI + 1e-12);
    }

    #[test]
    fn test_shortest_angular_distance() {
        assert_approx_eq!(shortest_angular_distance(0.0, PI / 2.0), PI / 2.0);
        assert_approx_eq!(shortest_angular_distance(PI / 2.0, 0.0), -PI / 2.0);
        let from = 179f64.to_radians();
        let to = (-179f64).to_radians();
        assert_approx_eq!(shortest_angular_distance(from, to), 2f64.to_radians());
        assert_approx_eq!(shortest_angular_distance(to, from), -2f64.to_radians());
    }

    #[test]
    fn test_roll_pitch_yaw_round_trip() {
        for &(roll, pitch, yaw) in &[
            (0.0, 0.0, 0.0),
            (0.1, -0.2, 0.3),
            (-3.0, 1.2, 2.9),
            (PI / 2.0, 0.0, -PI / 4.0),
            (1.0, -1.5, -3.1),
        ] {
            let q = from_roll_pitch_yaw(roll, pitch, yaw);
            let (r, p, y) = roll_pitch_yaw(&q);
            let rebuilt = from_roll_pitch_yaw(r, p, y);
            // same orientation up to the sign of the quaternion
            assert_approx_eq!(q.coords.dot(&rebuilt.coords).abs(), 1.0);
            assert_approx_eq!(shortest_angular_distance(roll, r), 0.0);
            assert_approx_eq!(shortest_angular_distance(pitch, p), 0.0);
            assert_approx_eq!(shortest_angular_distance(yaw, y), 0.0);
        }
    }

    #[test]
    fn test_roll_pitch_yaw_axes() {
        let (r, p, y) = roll_pitch_yaw(&UnitQuaternion::from_axis_angle(
            &nalgebra::Vector3::z_axis(),
            0.5,
        ));
        assert_approx_eq!(r, 0.0);
        assert_approx_eq!(p, 0.0);
        assert_approx_eq!(y, 0.5);
        let (r, p, y) = roll_pitch_yaw(&UnitQuaternion::from_axis_angle(
            &nalgebra::Vector3::x_axis(),
            -0.25,
        ));
        assert_approx_eq!(r, -0.25);
        assert_approx_eq!(p, 0.0);
        assert_approx_eq!(y, 0.0);
    }

    #[test]
    fn test_quaternion_angular_distance() {
        let a = from_roll_pitch_yaw(0.1, 0.2, 0.3);
        assert_approx_eq!(quaternion_angular_distance(&a, &a), 0.0);
        let b = from_roll_pitch_yaw(0.1, 0.2, 0.8);
        assert_approx_eq!(quaternion_angular_distance(&a, &b), 0.5, 1e-9);
        assert_approx_eq!(
            quaternion_angular_distance(&a, &b),
            quaternion_angular_distance(&b, &a)
        );
        // q and -q
        let negated = UnitQuaternion::new_unchecked(-a.into_inner());
        assert_approx_eq!(quaternion_angular_distance(&a, &negated), 0.0);
    }
}
