use std::time::SystemTime;

use async_trait::async_trait;
use auto_impl::auto_impl;

use crate::{error::Error, pose::PoseSample};

/// Source of reference poses, typically a simulator.
#[async_trait]
#[auto_impl(Box, Arc)]
pub trait GroundTruthProvider: Send + Sync {
    /// Returns the pose of `link_name` expressed in `reference_frame` at `stamp`.
    ///
    /// # Implementation
    ///
    /// Callers bound this call with a timeout, so implementations that wrap a
    /// blocking request should run it on a [blocking
    /// thread](https://docs.rs/tokio/1/tokio/task/fn.spawn_blocking.html)
    /// instead of stalling the runtime.
    async fn link_pose(
        &self,
        link_name: &str,
        reference_frame: &str,
        stamp: SystemTime,
    ) -> Result<PoseSample, Error>;
}
