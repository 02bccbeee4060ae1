//! Plain message types with the same layout as the middleware's
//! `geometry_msgs`, so that transport adapters only copy fields.

use std::time::SystemTime;

use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: SystemTime,
    pub frame_id: String,
}

impl Header {
    pub fn new(stamp: SystemTime, frame_id: impl Into<String>) -> Self {
        Self {
            stamp,
            frame_id: frame_id.into(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            stamp: SystemTime::UNIX_EPOCH,
            frame_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl Quaternion {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

/// Row-major 6x6 covariance over (x, y, z, rotation about x, y, z).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCovariance {
    pub pose: Pose,
    pub covariance: Vec<f64>,
}

impl Default for PoseWithCovariance {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            covariance: vec![0.0; 36],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCovarianceStamped {
    pub header: Header,
    pub pose: PoseWithCovariance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseArray {
    pub header: Header,
    pub poses: Vec<Pose>,
}

impl From<Pose> for na::Isometry3<f64> {
    fn from(pose: Pose) -> Self {
        let Pose {
            position: p,
            orientation: q,
        } = pose;
        na::Isometry3::from_parts(
            na::Translation3::new(p.x, p.y, p.z),
            na::UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z)),
        )
    }
}

impl From<na::Isometry3<f64>> for Pose {
    fn from(isometry: na::Isometry3<f64>) -> Self {
        let t = isometry.translation.vector;
        let q = isometry.rotation.quaternion().coords;
        Self {
            position: Point {
                x: t[0],
                y: t[1],
                z: t[2],
            },
            orientation: Quaternion {
                x: q[0],
                y: q[1],
                z: q[2],
                w: q[3],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_pose_to_isometry() {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let pose = Pose {
            position: Point {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            orientation: Quaternion {
                x: 0.0,
                y: 0.0,
                z: half,
                w: half,
            },
        };
        let isometry: na::Isometry3<f64> = pose.into();
        assert_approx_eq!(isometry.translation.vector[0], 1.0);
        assert_approx_eq!(isometry.translation.vector[1], 2.0);
        assert_approx_eq!(isometry.translation.vector[2], 3.0);
        assert_approx_eq!(isometry.rotation.euler_angles().2, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_isometry_to_pose() {
        let isometry = na::Isometry3::new(na::Vector3::new(-1.0, 0.5, 0.0), na::Vector3::z() * 0.3);
        let pose = Pose::from(isometry);
        assert_approx_eq!(pose.position.x, -1.0);
        assert_approx_eq!(pose.position.y, 0.5);
        assert_approx_eq!(pose.orientation.norm(), 1.0);
        assert_approx_eq!(pose.orientation.z, (0.15f64).sin());
        assert_approx_eq!(pose.orientation.w, (0.15f64).cos());
    }

    #[test]
    fn test_default_quaternion_is_identity() {
        let q = Quaternion::default();
        assert_approx_eq!(q.w, 1.0);
        assert_approx_eq!(q.norm(), 1.0);
    }
}
