use localization_error::{
    msg::PoseArray, Error, ErrorReport, ErrorSummary, LocalizationErrorPublisher,
};
use serde::Serialize;
use tracing::{debug, info};

const TARGET: &str = "localization_error";

/// Publishes every batch as `info` events, with the payload encoded as JSON.
///
/// Each event has a `topic` field named after the stream it stands for, so
/// the output can be split back into the pose error, summary, and pose
/// history streams.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher {
    include_poses: bool,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also logs the full pose histories instead of their lengths only.
    pub fn with_poses(mut self) -> Self {
        self.include_poses = true;
        self
    }

    fn poses(&self, topic: &str, poses: &PoseArray) -> Result<(), Error> {
        if self.include_poses {
            info!(
                target: TARGET,
                topic,
                frame_id = %poses.header.frame_id,
                count = poses.poses.len(),
                poses = %to_json(topic, &poses.poses)?,
            );
        } else {
            debug!(
                target: TARGET,
                topic,
                frame_id = %poses.header.frame_id,
                count = poses.poses.len(),
            );
        }
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(topic: &str, value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|e| Error::Publish {
        topic: topic.to_owned(),
        message: e.to_string(),
    })
}

impl LocalizationErrorPublisher for LogPublisher {
    fn publish_pose_errors(&self, reports: &[ErrorReport]) -> Result<(), Error> {
        let topic = "pose_errors";
        info!(
            target: TARGET,
            topic,
            count = reports.len(),
            reports = %to_json(topic, reports)?,
        );
        Ok(())
    }

    fn publish_error_summary(&self, summary: &ErrorSummary) -> Result<(), Error> {
        info!(
            target: TARGET,
            topic = "error_summary",
            count = summary.translation.count,
            translation_mean = summary.translation.mean,
            translation_std_dev = summary.translation.std_dev,
            translation_max = summary.translation.max,
            rotation_mean = summary.rotation.mean,
            rotation_std_dev = summary.rotation.std_dev,
            rotation_max = summary.rotation.max,
            distance_unit = ?summary.distance_unit,
            angle_unit = ?summary.angle_unit,
        );
        Ok(())
    }

    fn publish_localization_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        self.poses("localization_poses", poses)
    }

    fn publish_simulation_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        self.poses("simulation_poses", poses)
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use localization_error::{msg::Header, AngleUnit, DistanceUnit, RotationError};

    use super::*;

    fn report(distance: f64) -> ErrorReport {
        ErrorReport {
            stamp: SystemTime::UNIX_EPOCH,
            translation_x: distance,
            translation_y: 0.0,
            translation_z: 0.0,
            translation_distance: distance,
            rotation: RotationError::Angle(0.0),
            distance_unit: DistanceUnit::Millimeters,
            angle_unit: AngleUnit::Degrees,
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json("pose_errors", &[report(15.0)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["translation_distance"], 15.0);
    }

    #[test]
    fn test_publish() {
        let publisher = LogPublisher::new().with_poses();
        let poses = PoseArray {
            header: Header::new(SystemTime::UNIX_EPOCH, "map"),
            poses: vec![Default::default(); 2],
        };
        publisher.publish_pose_errors(&[report(1.0), report(2.0)]).unwrap();
        let summary = ErrorSummary::from_reports(SystemTime::UNIX_EPOCH, &[report(1.0)]).unwrap();
        publisher.publish_error_summary(&summary).unwrap();
        publisher.publish_localization_poses(&poses).unwrap();
        LogPublisher::new().publish_simulation_poses(&poses).unwrap();
    }
}
