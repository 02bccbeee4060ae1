use std::time::{Duration, SystemTime};

use localization_error::{
    msg::{Header, PoseStamped, PoseWithCovarianceStamped},
    Error, ErrorComputer, ErrorReport, ErrorSummary, GroundTruthProvider,
    LocalizationErrorPublisher, PoseSample,
};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{config::LocalizationErrorConfig, session::Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorState {
    Idle,
    Running,
}

/// A pose message delivered by the middleware.
#[derive(Debug, Clone, PartialEq)]
pub enum PoseInput {
    PoseStamped(PoseStamped),
    PoseWithCovarianceStamped(PoseWithCovarianceStamped),
}

impl From<PoseStamped> for PoseInput {
    fn from(pose: PoseStamped) -> Self {
        Self::PoseStamped(pose)
    }
}

impl From<PoseWithCovarianceStamped> for PoseInput {
    fn from(pose: PoseWithCovarianceStamped) -> Self {
        Self::PoseWithCovarianceStamped(pose)
    }
}

/// Compares localization poses with the ground truth of a simulator and
/// periodically publishes the discrepancy.
///
/// Poses are accumulated together with the ground truth fetched for them.
/// Each publish tick reduces the accumulated samples to [`ErrorReport`]s,
/// publishes them along with both pose histories, and starts over.
#[derive(Debug)]
pub struct LocalizationErrorEstimator<G, P> {
    config: LocalizationErrorConfig,
    error_computer: ErrorComputer,
    ground_truth_provider: G,
    publisher: P,
    publish_period: Duration,
    oracle_timeout: Duration,
    session: Session,
    state: EstimatorState,
}

impl<G, P> LocalizationErrorEstimator<G, P>
where
    G: GroundTruthProvider,
    P: LocalizationErrorPublisher,
{
    /// Fails with [`Error::ConfigurationInvalid`] if `config` does not validate.
    pub fn new(
        config: LocalizationErrorConfig,
        ground_truth_provider: G,
        publisher: P,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            error_computer: config.error_computer(),
            publish_period: config.publish_period()?,
            oracle_timeout: config.oracle_timeout()?,
            config,
            ground_truth_provider,
            publisher,
            session: Session::new(),
            state: EstimatorState::Idle,
        })
    }

    pub fn config(&self) -> &LocalizationErrorConfig {
        &self.config
    }

    pub fn state(&self) -> EstimatorState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn start(&mut self) -> Result<(), Error> {
        if self.state == EstimatorState::Running {
            return Err(Error::AlreadyRunning);
        }
        self.state = EstimatorState::Running;
        info!(
            publish_rate = self.config.publish_rate,
            map_frame_id = %self.config.map_frame_id,
            link_name = %self.config.link_name(),
            "localization error estimator started"
        );
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), Error> {
        match self.state {
            EstimatorState::Running => Ok(()),
            EstimatorState::Idle => Err(Error::NotRunning),
        }
    }

    pub async fn process_pose_stamped(&mut self, pose: &PoseStamped) -> Result<(), Error> {
        self.ingest(PoseSample::try_from(pose)).await
    }

    pub async fn process_pose_with_covariance_stamped(
        &mut self,
        pose: &PoseWithCovarianceStamped,
    ) -> Result<(), Error> {
        self.ingest(PoseSample::try_from(pose)).await
    }

    pub async fn process(&mut self, input: &PoseInput) -> Result<(), Error> {
        match input {
            PoseInput::PoseStamped(pose) => self.process_pose_stamped(pose).await,
            PoseInput::PoseWithCovarianceStamped(pose) => {
                self.process_pose_with_covariance_stamped(pose).await
            }
        }
    }

    async fn ingest(&mut self, sample: Result<PoseSample, Error>) -> Result<(), Error> {
        self.ensure_running()?;
        let sample = match sample {
            Ok(sample) => sample,
            Err(e) => {
                warn!("dropping pose: {e}");
                return Err(e);
            }
        };
        let ground_truth = match self.fetch_ground_truth(sample.stamp()).await {
            Ok(ground_truth) => Some(ground_truth),
            Err(e) => {
                warn!("keeping pose without ground truth: {e}");
                None
            }
        };
        debug!(
            frame_id = sample.frame_id(),
            paired = ground_truth.is_some(),
            received = self.session.poses_received() + 1,
            "pose received"
        );
        self.session.push(sample, ground_truth);
        Ok(())
    }

    /// Asks the provider for the configured link at `stamp`, giving up after
    /// the configured oracle timeout.
    pub async fn fetch_ground_truth(&self, stamp: SystemTime) -> Result<PoseSample, Error> {
        let link_name = self.config.link_name();
        let timeout = self.oracle_timeout;
        match tokio::time::timeout(
            timeout,
            self.ground_truth_provider
                .link_pose(link_name, &self.config.map_frame_id, stamp),
        )
        .await
        {
            Ok(result) => result.map_err(|e| match e {
                e @ (Error::OracleUnavailable { .. } | Error::OracleTimeout { .. }) => e,
                e => Error::OracleUnavailable {
                    link: link_name.to_owned(),
                    message: e.to_string(),
                },
            }),
            Err(_) => Err(Error::OracleTimeout {
                link: link_name.to_owned(),
                timeout,
            }),
        }
    }

    /// Error reports of every paired sample received since the last publish.
    pub fn update_localization_error(&self) -> Vec<ErrorReport> {
        self.error_computer.compute_all(self.session.pairs())
    }

    /// Publish tick. Flushes the session if enough poses were received,
    /// otherwise leaves it untouched. Returns the number of published reports.
    pub fn publish(&mut self, now: SystemTime) -> Result<usize, Error> {
        self.ensure_running()?;
        let received = self.session.poses_received();
        let threshold = self.config.sampling_threshold();
        if received < threshold {
            debug!(received, threshold, "not enough poses to publish");
            return Ok(0);
        }
        self.flush(now)
    }

    /// Publishes everything accumulated so far and clears the session, even
    /// when publishing fails.
    pub fn flush(&mut self, now: SystemTime) -> Result<usize, Error> {
        self.ensure_running()?;
        let reports = self.update_localization_error();
        let unpaired = self.session.unpaired();
        if unpaired > 0 {
            warn!(unpaired, "skipping poses without ground truth");
        }
        let header = Header::new(now, self.config.map_frame_id.clone());
        let (localization_poses, simulation_poses) = self.session.pose_histories(&header);
        let received = self.session.poses_received();
        self.session.clear();

        let summary = ErrorSummary::from_reports(now, &reports);
        if let Some(summary) = &summary {
            debug!(
                translation_mean = summary.translation.mean,
                rotation_mean = summary.rotation.mean,
                "error summary"
            );
        }
        // Every stream is attempted; the first failure is returned.
        let results = [
            ("pose_errors", self.publisher.publish_pose_errors(&reports)),
            (
                "error_summary",
                summary
                    .as_ref()
                    .map_or(Ok(()), |s| self.publisher.publish_error_summary(s)),
            ),
            (
                "localization_poses",
                self.publisher.publish_localization_poses(&localization_poses),
            ),
            (
                "simulation_poses",
                self.publisher.publish_simulation_poses(&simulation_poses),
            ),
        ];
        let mut first_error = None;
        for (stream, result) in results {
            if let Err(e) = result {
                warn!(stream, "failed to publish: {e}");
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        info!(received, reports = reports.len(), "published localization error");
        Ok(reports.len())
    }

    /// Runs the estimator until `poses` is disconnected.
    ///
    /// Incoming poses and publish ticks are handled one at a time. When the
    /// channel closes, whatever is left in the session is flushed once.
    pub async fn run(mut self, poses: flume::Receiver<PoseInput>) -> Result<(), Error> {
        self.start()?;
        let period = self.publish_period;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.publish(SystemTime::now()) {
                        debug!("publish tick failed: {e}");
                    }
                }
                input = poses.recv_async() => match input {
                    Ok(input) => {
                        if let Err(e) = self.process(&input).await {
                            debug!("pose rejected: {e}");
                        }
                    }
                    Err(_) => break,
                },
            }
        }
        info!("pose input closed");
        if !self.session.is_empty() {
            self.flush(SystemTime::now())?;
        }
        Ok(())
    }
}
