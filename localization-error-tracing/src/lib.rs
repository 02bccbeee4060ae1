#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]

mod log_publisher;

use std::time::SystemTime;

use localization_error::{
    async_trait, msg::PoseArray, Error, ErrorReport, ErrorSummary, GroundTruthProvider,
    LocalizationErrorPublisher, PoseSample,
};
use tracing::trace;

pub use crate::log_publisher::LogPublisher;

#[derive(Debug)]
pub struct Tracing<T>(T);

impl<T> Tracing<T> {
    pub fn new(v: T) -> Self {
        Self(v)
    }

    pub fn get_ref(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Tracing<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[async_trait]
impl<T: GroundTruthProvider> GroundTruthProvider for Tracing<T> {
    async fn link_pose(
        &self,
        link_name: &str,
        reference_frame: &str,
        stamp: SystemTime,
    ) -> Result<PoseSample, Error> {
        let d = stamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        let result = self.0.link_pose(link_name, reference_frame, stamp).await;
        match &result {
            Ok(sample) => {
                let translation = sample.position();
                let rotation = sample.orientation().quaternion();
                trace!(
                    method = "localization_error::GroundTruthProvider::link_pose",
                    link_name,
                    reference_frame,
                    time_secs = d.as_secs(),
                    time_nanos = d.subsec_nanos(),
                    pose_translation_x = translation.x,
                    pose_translation_y = translation.y,
                    pose_translation_z = translation.z,
                    pose_rotation_i = rotation.i,
                    pose_rotation_j = rotation.j,
                    pose_rotation_k = rotation.k,
                    pose_rotation_w = rotation.w,
                );
            }
            Err(e) => {
                trace!(
                    method = "localization_error::GroundTruthProvider::link_pose",
                    link_name,
                    reference_frame,
                    time_secs = d.as_secs(),
                    time_nanos = d.subsec_nanos(),
                    error = %e,
                );
            }
        }
        result
    }
}

impl<T: LocalizationErrorPublisher> LocalizationErrorPublisher for Tracing<T> {
    fn publish_pose_errors(&self, reports: &[ErrorReport]) -> Result<(), Error> {
        trace!(
            method = "localization_error::LocalizationErrorPublisher::publish_pose_errors",
            count = reports.len(),
            ?reports
        );
        self.0.publish_pose_errors(reports)
    }

    fn publish_error_summary(&self, summary: &ErrorSummary) -> Result<(), Error> {
        trace!(
            method = "localization_error::LocalizationErrorPublisher::publish_error_summary",
            ?summary
        );
        self.0.publish_error_summary(summary)
    }

    fn publish_localization_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        trace!(
            method = "localization_error::LocalizationErrorPublisher::publish_localization_poses",
            frame_id = %poses.header.frame_id,
            count = poses.poses.len(),
        );
        self.0.publish_localization_poses(poses)
    }

    fn publish_simulation_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        trace!(
            method = "localization_error::LocalizationErrorPublisher::publish_simulation_poses",
            frame_id = %poses.header.frame_id,
            count = poses.poses.len(),
        );
        self.0.publish_simulation_poses(poses)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use localization_error::{
        msg::Header, DummyGroundTruthProvider, DummyLocalizationErrorPublisher,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn subscriber(buffer: &Buffer) -> impl tracing::Subscriber + Send + Sync + 'static {
        let buffer = buffer.clone();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || buffer.clone())
            .finish()
    }

    #[test]
    fn test_link_pose() {
        let buffer = Buffer::default();
        let provider = Tracing::new(DummyGroundTruthProvider::new());
        provider.get_ref().fail_on_call(1);
        tracing::subscriber::with_default(subscriber(&buffer), || {
            let sample = tokio_test::block_on(provider.link_pose(
                "base_link",
                "map",
                SystemTime::UNIX_EPOCH,
            ))
            .unwrap();
            assert_eq!(sample.frame_id(), "map");
            assert!(tokio_test::block_on(provider.link_pose(
                "base_link",
                "map",
                SystemTime::UNIX_EPOCH,
            ))
            .is_err());
        });
        let logs = buffer.contents();
        assert_eq!(
            logs.matches("localization_error::GroundTruthProvider::link_pose")
                .count(),
            2
        );
        assert!(logs.contains("pose_rotation_w=1"));
        assert!(logs.contains("error="));
        assert_eq!(provider.into_inner().call_count(), 2);
    }

    #[test]
    fn test_publisher() {
        let buffer = Buffer::default();
        let publisher = Tracing::from(DummyLocalizationErrorPublisher::new());
        let poses = PoseArray {
            header: Header::new(SystemTime::UNIX_EPOCH, "map"),
            poses: vec![Default::default(); 3],
        };
        tracing::subscriber::with_default(subscriber(&buffer), || {
            publisher.publish_pose_errors(&[]).unwrap();
            publisher.publish_localization_poses(&poses).unwrap();
            publisher.publish_simulation_poses(&poses).unwrap();
        });
        let logs = buffer.contents();
        assert!(logs.contains("publish_pose_errors"));
        assert!(logs.contains("publish_localization_poses"));
        assert!(logs.contains("count=3"));
        assert_eq!(publisher.get_ref().pose_errors().len(), 1);
        assert_eq!(publisher.get_ref().simulation_poses().len(), 1);
    }
}
