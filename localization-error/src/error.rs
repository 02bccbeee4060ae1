use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "localization-error: Ground truth for link={} is unavailable : {}",
        link,
        message
    )]
    OracleUnavailable { link: String, message: String },
    #[error(
        "localization-error: Ground truth for link={} timed out after {:?}",
        link,
        timeout
    )]
    OracleTimeout { link: String, timeout: Duration },
    #[error("localization-error: Invalid configuration {} : {}", field, message)]
    ConfigurationInvalid { field: String, message: String },
    #[error("localization-error: Malformed pose message : {}", .0)]
    MalformedPoseMessage(String),
    #[error("localization-error: Estimator is already running")]
    AlreadyRunning,
    #[error("localization-error: Estimator is not running")]
    NotRunning,
    #[error("localization-error: Failed to publish {} : {}", topic, message)]
    Publish { topic: String, message: String },
    #[error("localization-error: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns `true` if the ground-truth oracle could not answer, either
    /// because it failed or because it did not respond in time.
    pub fn is_oracle_unavailable(&self) -> bool {
        matches!(
            self,
            Error::OracleUnavailable { .. } | Error::OracleTimeout { .. }
        )
    }
}
