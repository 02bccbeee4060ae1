use std::sync::Mutex;

use crate::{
    error::Error, msg::PoseArray, report::ErrorReport, statistics::ErrorSummary,
    traits::LocalizationErrorPublisher,
};

/// Dummy LocalizationErrorPublisher for debug or tests. Keeps everything it
/// was asked to publish, one entry per call.
#[derive(Debug, Default)]
pub struct DummyLocalizationErrorPublisher {
    pub pose_errors: Mutex<Vec<Vec<ErrorReport>>>,
    pub error_summaries: Mutex<Vec<ErrorSummary>>,
    pub localization_poses: Mutex<Vec<PoseArray>>,
    pub simulation_poses: Mutex<Vec<PoseArray>>,
}

impl DummyLocalizationErrorPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose_errors(&self) -> Vec<Vec<ErrorReport>> {
        self.pose_errors.lock().unwrap().clone()
    }

    pub fn error_summaries(&self) -> Vec<ErrorSummary> {
        self.error_summaries.lock().unwrap().clone()
    }

    pub fn localization_poses(&self) -> Vec<PoseArray> {
        self.localization_poses.lock().unwrap().clone()
    }

    pub fn simulation_poses(&self) -> Vec<PoseArray> {
        self.simulation_poses.lock().unwrap().clone()
    }
}

impl LocalizationErrorPublisher for DummyLocalizationErrorPublisher {
    fn publish_pose_errors(&self, reports: &[ErrorReport]) -> Result<(), Error> {
        self.pose_errors.lock().unwrap().push(reports.to_vec());
        Ok(())
    }

    fn publish_error_summary(&self, summary: &ErrorSummary) -> Result<(), Error> {
        self.error_summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }

    fn publish_localization_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        self.localization_poses.lock().unwrap().push(poses.clone());
        Ok(())
    }

    fn publish_simulation_poses(&self, poses: &PoseArray) -> Result<(), Error> {
        self.simulation_poses.lock().unwrap().push(poses.clone());
        Ok(())
    }
}
