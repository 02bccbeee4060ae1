use std::time::SystemTime;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AngleUnit {
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Converts `radians` into this unit.
    pub fn convert(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Radians => radians,
            AngleUnit::Degrees => radians.to_degrees(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DistanceUnit {
    Meters,
    Millimeters,
}

impl DistanceUnit {
    /// Converts `meters` into this unit.
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Millimeters => meters * 1000.0,
        }
    }
}

/// How orientation errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AngleRepresentation {
    /// Absolute per-axis roll, pitch and yaw differences.
    RollPitchYaw,
    /// Single angle of the rotation between both orientations.
    Quaternion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationError {
    RollPitchYaw { roll: f64, pitch: f64, yaw: f64 },
    Angle(f64),
}

impl RotationError {
    /// Scalar size of the error: the per-axis euclidean norm for
    /// [`RotationError::RollPitchYaw`], the angle itself otherwise.
    pub fn magnitude(&self) -> f64 {
        match *self {
            RotationError::RollPitchYaw { roll, pitch, yaw } => {
                (roll * roll + pitch * pitch + yaw * yaw).sqrt()
            }
            RotationError::Angle(angle) => angle,
        }
    }
}

/// Discrepancy between one localization pose and its ground truth.
///
/// Every value is already expressed in `distance_unit` / `angle_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub stamp: SystemTime,
    pub translation_x: f64,
    pub translation_y: f64,
    pub translation_z: f64,
    pub translation_distance: f64,
    pub rotation: RotationError,
    pub distance_unit: DistanceUnit,
    pub angle_unit: AngleUnit,
}

impl ErrorReport {
    pub fn representation(&self) -> AngleRepresentation {
        match self.rotation {
            RotationError::RollPitchYaw { .. } => AngleRepresentation::RollPitchYaw,
            RotationError::Angle(_) => AngleRepresentation::Quaternion,
        }
    }
}
