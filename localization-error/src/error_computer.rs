use tracing::debug;

use crate::{
    angles::{quaternion_angular_distance, shortest_angular_distance},
    pose::{PosePair, PoseSample},
    report::{AngleRepresentation, AngleUnit, DistanceUnit, ErrorReport, RotationError},
};

/// Computes [`ErrorReport`]s between localization poses and their ground truth.
///
/// Everything is computed in meters and radians; conversion to the output
/// units happens once, when the report is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorComputer {
    pub angle_representation: AngleRepresentation,
    pub angle_unit: AngleUnit,
    pub distance_unit: DistanceUnit,
}

impl ErrorComputer {
    pub fn new(
        angle_representation: AngleRepresentation,
        angle_unit: AngleUnit,
        distance_unit: DistanceUnit,
    ) -> Self {
        Self {
            angle_representation,
            angle_unit,
            distance_unit,
        }
    }

    /// Error of `localization` with respect to `ground_truth`, stamped with the
    /// localization time.
    pub fn compute(&self, localization: &PoseSample, ground_truth: &PoseSample) -> ErrorReport {
        let delta = localization.position() - ground_truth.position();
        let rotation = match self.angle_representation {
            AngleRepresentation::RollPitchYaw => {
                let (lr, lp, ly) = localization.roll_pitch_yaw();
                let (gr, gp, gy) = ground_truth.roll_pitch_yaw();
                RotationError::RollPitchYaw {
                    roll: self.angle(shortest_angular_distance(gr, lr).abs()),
                    pitch: self.angle(shortest_angular_distance(gp, lp).abs()),
                    yaw: self.angle(shortest_angular_distance(gy, ly).abs()),
                }
            }
            AngleRepresentation::Quaternion => RotationError::Angle(self.angle(
                quaternion_angular_distance(localization.orientation(), ground_truth.orientation()),
            )),
        };
        ErrorReport {
            stamp: localization.stamp(),
            translation_x: self.distance(delta[0].abs()),
            translation_y: self.distance(delta[1].abs()),
            translation_z: self.distance(delta[2].abs()),
            translation_distance: self.distance(delta.norm()),
            rotation,
            distance_unit: self.distance_unit,
            angle_unit: self.angle_unit,
        }
    }

    /// One report per paired sample, in arrival order. Unpaired samples are skipped.
    pub fn compute_all(&self, pairs: &[PosePair]) -> Vec<ErrorReport> {
        let reports: Vec<_> = pairs
            .iter()
            .filter_map(|pair| {
                pair.ground_truth
                    .as_ref()
                    .map(|ground_truth| self.compute(&pair.localization, ground_truth))
            })
            .collect();
        if reports.len() != pairs.len() {
            debug!(
                "skipped {} unpaired samples out of {}",
                pairs.len() - reports.len(),
                pairs.len()
            );
        }
        reports
    }

    fn distance(&self, meters: f64) -> f64 {
        self.distance_unit.convert(meters)
    }

    fn angle(&self, radians: f64) -> f64 {
        self.angle_unit.convert(radians)
    }
}

impl Default for ErrorComputer {
    fn default() -> Self {
        Self::new(
            AngleRepresentation::RollPitchYaw,
            AngleUnit::Radians,
            DistanceUnit::Meters,
        )
    }
}
