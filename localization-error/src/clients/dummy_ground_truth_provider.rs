use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use nalgebra::Isometry3;

use crate::{error::Error, pose::PoseSample, traits::GroundTruthProvider};

/// Dummy GroundTruthProvider for debug or tests.
///
/// Answers every request with `current_pose`, except the calls whose
/// zero-based index was registered with [`fail_on_call`](Self::fail_on_call).
#[derive(Debug)]
pub struct DummyGroundTruthProvider {
    pub current_pose: Mutex<Isometry3<f64>>,
    pub delay: Mutex<Option<Duration>>,
    failing_calls: Mutex<HashSet<usize>>,
    call_count: AtomicUsize,
}

impl DummyGroundTruthProvider {
    pub fn new() -> Self {
        Self::with_pose(Isometry3::identity())
    }

    pub fn with_pose(pose: Isometry3<f64>) -> Self {
        Self {
            current_pose: Mutex::new(pose),
            delay: Mutex::new(None),
            failing_calls: Mutex::new(HashSet::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn set_pose(&self, pose: Isometry3<f64>) {
        *self.current_pose.lock().unwrap() = pose;
    }

    /// Sleeps for `delay` before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn fail_on_call(&self, index: usize) {
        self.failing_calls.lock().unwrap().insert(index);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for DummyGroundTruthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroundTruthProvider for DummyGroundTruthProvider {
    async fn link_pose(
        &self,
        link_name: &str,
        reference_frame: &str,
        stamp: SystemTime,
    ) -> Result<PoseSample, Error> {
        let index = self.call_count.fetch_add(1, Ordering::Relaxed);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_calls.lock().unwrap().contains(&index) {
            return Err(Error::OracleUnavailable {
                link: link_name.to_owned(),
                message: format!("call {index} failed"),
            });
        }
        let pose = *self.current_pose.lock().unwrap();
        Ok(PoseSample::new(stamp, reference_frame, pose))
    }
}
