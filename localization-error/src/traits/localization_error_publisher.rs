use auto_impl::auto_impl;

use crate::{error::Error, msg::PoseArray, report::ErrorReport, statistics::ErrorSummary};

/// Sink for everything produced by one publish tick.
#[auto_impl(&, Box, Arc)]
pub trait LocalizationErrorPublisher: Send + Sync {
    fn publish_pose_errors(&self, reports: &[ErrorReport]) -> Result<(), Error>;

    fn publish_error_summary(&self, _summary: &ErrorSummary) -> Result<(), Error> {
        Ok(())
    }

    fn publish_localization_poses(&self, poses: &PoseArray) -> Result<(), Error>;

    fn publish_simulation_poses(&self, poses: &PoseArray) -> Result<(), Error>;
}
