use std::time::SystemTime;

use nalgebra::{Isometry3, Matrix6, UnitQuaternion, Vector3};

use crate::{
    angles,
    error::Error,
    msg::{self, PoseStamped, PoseWithCovarianceStamped},
};

/// Largest accepted deviation of a message quaternion's norm from 1.
pub const QUATERNION_NORM_TOLERANCE: f64 = 1e-3;

const COVARIANCE_LEN: usize = 36;

/// A timestamped pose. Fields are fixed once the sample is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    stamp: SystemTime,
    frame_id: String,
    pose: Isometry3<f64>,
    covariance: Option<Matrix6<f64>>,
}

impl PoseSample {
    pub fn new(stamp: SystemTime, frame_id: impl Into<String>, pose: Isometry3<f64>) -> Self {
        Self {
            stamp,
            frame_id: frame_id.into(),
            pose,
            covariance: None,
        }
    }

    pub fn with_covariance(mut self, covariance: Matrix6<f64>) -> Self {
        self.covariance = Some(covariance);
        self
    }

    pub fn stamp(&self) -> SystemTime {
        self.stamp
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn pose(&self) -> &Isometry3<f64> {
        &self.pose
    }

    pub fn position(&self) -> Vector3<f64> {
        self.pose.translation.vector
    }

    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.pose.rotation
    }

    /// `(roll, pitch, yaw)` in radians, see [`angles::roll_pitch_yaw`].
    pub fn roll_pitch_yaw(&self) -> (f64, f64, f64) {
        angles::roll_pitch_yaw(&self.pose.rotation)
    }

    pub fn covariance(&self) -> Option<&Matrix6<f64>> {
        self.covariance.as_ref()
    }

    pub fn to_pose_msg(&self) -> msg::Pose {
        self.pose.into()
    }
}

/// A localization sample and the ground truth fetched for it. `ground_truth`
/// is `None` when the oracle could not answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PosePair {
    pub localization: PoseSample,
    pub ground_truth: Option<PoseSample>,
}

impl PosePair {
    pub fn new(localization: PoseSample, ground_truth: Option<PoseSample>) -> Self {
        Self {
            localization,
            ground_truth,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.ground_truth.is_some()
    }
}

fn malformed(message: String) -> Error {
    Error::MalformedPoseMessage(message)
}

fn validate_pose(pose: &msg::Pose) -> Result<Isometry3<f64>, Error> {
    let p = &pose.position;
    let q = &pose.orientation;
    if ![p.x, p.y, p.z].iter().all(|v| v.is_finite()) {
        return Err(malformed(format!("non finite position {p:?}")));
    }
    if ![q.x, q.y, q.z, q.w].iter().all(|v| v.is_finite()) {
        return Err(malformed(format!("non finite orientation {q:?}")));
    }
    let norm = q.norm();
    if (norm - 1.0).abs() > QUATERNION_NORM_TOLERANCE {
        return Err(malformed(format!(
            "orientation is not a unit quaternion (norm={norm})"
        )));
    }
    Ok((*pose).into())
}

fn validate_covariance(covariance: &[f64]) -> Result<Matrix6<f64>, Error> {
    if covariance.len() != COVARIANCE_LEN {
        return Err(malformed(format!(
            "covariance must have {COVARIANCE_LEN} elements, got {}",
            covariance.len()
        )));
    }
    if !covariance.iter().all(|v| v.is_finite()) {
        return Err(malformed("non finite covariance".to_owned()));
    }
    let matrix = Matrix6::from_row_slice(covariance);
    if matrix.diagonal().iter().any(|v| *v < 0.0) {
        return Err(malformed(format!(
            "negative covariance diagonal {:?}",
            matrix.diagonal().as_slice()
        )));
    }
    Ok(matrix)
}

impl TryFrom<&PoseStamped> for PoseSample {
    type Error = Error;

    fn try_from(msg: &PoseStamped) -> Result<Self, Self::Error> {
        let pose = validate_pose(&msg.pose)?;
        Ok(Self::new(msg.header.stamp, msg.header.frame_id.clone(), pose))
    }
}

impl TryFrom<&PoseWithCovarianceStamped> for PoseSample {
    type Error = Error;

    fn try_from(msg: &PoseWithCovarianceStamped) -> Result<Self, Self::Error> {
        let pose = validate_pose(&msg.pose.pose)?;
        let covariance = validate_covariance(&msg.pose.covariance)?;
        Ok(Self::new(msg.header.stamp, msg.header.frame_id.clone(), pose)
            .with_covariance(covariance))
    }
}
